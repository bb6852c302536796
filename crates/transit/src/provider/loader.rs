//! CSV station table loader.
//!
//! Expects a header row with `Station`, `Line` (or `S-Bahn Line`),
//! `Latitude` and `Longitude` columns. Extra columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::models::types::{Result, TransitError};
use crate::provider::static_provider::StationRecord;

#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "Station")]
    station: String,
    #[serde(rename = "Line", alias = "S-Bahn Line")]
    line: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// Load every station row from a CSV file
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<StationRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let records = read_stations(file)?;

    tracing::info!(path = %path.display(), records = records.len(), "loaded station table");
    Ok(records)
}

/// Parse station rows from any CSV reader.
///
/// A row with a bad value fails the whole load; a half-loaded station table
/// would silently skew every nearest-station match.
pub fn read_stations<R: Read>(reader: R) -> Result<Vec<StationRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<StationRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line_no = index + 2;
        let row = row.map_err(|e| TransitError::Parse(format!("line {}: {}", line_no, e)))?;

        let record = StationRecord::new(row.station, row.line, row.latitude, row.longitude)
            .map_err(|e| TransitError::InvalidData(format!("line {}: {}", line_no, e)))?;
        records.push(record);
    }

    Ok(records)
}
