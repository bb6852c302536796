//! In-memory station directory.
//!
//! Stores every station row as loaded (one per station/line pair) and answers
//! nearest-station queries with a linear scan. Station tables hold tens of
//! stations, so a spatial index would cost more to build than it saves.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};
use crate::spatial::queries::{haversine_distance, point_from_degrees, round_km};

/// Separator used when joining line names for display
pub const LINE_SEPARATOR: &str = ";";

// ============================================================================
// Concrete Implementation of TransitStation
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct StationRecord {
    pub name: StationIdentifier,
    pub line: LineIdentifier,
    pub location: Point,
}

impl StationRecord {
    /// Build a record from degrees, validating the coordinate ranges
    pub fn new(
        name: impl Into<StationIdentifier>,
        line: impl Into<LineIdentifier>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let name = name.into();
        let line = line.into();

        if name.is_empty() {
            return Err(TransitError::InvalidData("station name is empty".into()));
        }
        if line.is_empty() {
            return Err(TransitError::InvalidData(format!(
                "station {} has an empty line name",
                name
            )));
        }

        Ok(Self {
            name,
            line,
            location: point_from_degrees(latitude, longitude)?,
        })
    }
}

impl TransitStation for StationRecord {
    fn name(&self) -> &StationIdentifier {
        &self.name
    }

    fn line(&self) -> &LineIdentifier {
        &self.line
    }

    fn location(&self) -> Point {
        self.location
    }
}

// ============================================================================
// Static Directory
// ============================================================================

/// In-memory station directory
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Debug)]
pub struct StaticStationDirectory {
    // Every row in load order; the scan order defines the tie-break
    stations: Vec<Arc<StationRecord>>,

    // Unique lines per station name, in first-seen order
    lines_by_station: HashMap<StationIdentifier, Arc<[LineIdentifier]>>,
}

impl StaticStationDirectory {
    /// Build a directory from loaded rows.
    ///
    /// Fails on an empty table or on any record with invalid coordinates,
    /// since either means the station source is misconfigured.
    pub fn from_records(records: Vec<StationRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(TransitError::EmptyDirectory);
        }

        for record in &records {
            point_from_degrees(record.location.y(), record.location.x())?;
        }

        let stations: Vec<Arc<StationRecord>> = records.into_iter().map(Arc::new).collect();

        let mut grouped: HashMap<StationIdentifier, Vec<LineIdentifier>> = HashMap::new();
        for station in &stations {
            let lines = grouped.entry(station.name.clone()).or_default();
            if !lines.contains(&station.line) {
                lines.push(station.line.clone());
            }
        }

        let lines_by_station = grouped
            .into_iter()
            .map(|(name, lines)| (name, Arc::from(lines)))
            .collect();

        tracing::debug!(records = stations.len(), "built station directory");

        Ok(Self {
            stations,
            lines_by_station,
        })
    }

    /// Unique lines serving `station_name`, empty if unknown
    pub fn lines(&self, station_name: &str) -> &[LineIdentifier] {
        self.lines_by_station
            .get(&StationIdentifier::new(station_name))
            .map(|lines| &lines[..])
            .unwrap_or(&[])
    }

    /// Number of distinct station names
    pub fn station_count(&self) -> usize {
        self.lines_by_station.len()
    }

    pub fn records(&self) -> &[Arc<StationRecord>] {
        &self.stations
    }
}

impl StationDirectory for StaticStationDirectory {
    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>> {
        self.stations
            .iter()
            .map(|s| s.clone() as Arc<dyn TransitStation>)
            .collect()
    }

    fn len(&self) -> usize {
        self.stations.len()
    }

    fn lines_for(&self, station_name: &str) -> String {
        self.lines(station_name)
            .iter()
            .map(LineIdentifier::as_str)
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }

    fn nearest_station(&self, point: Point) -> Option<StationMatch> {
        let mut nearest: Option<(&StationRecord, f64)> = None;

        for station in &self.stations {
            let dist = haversine_distance(point, station.location);
            // Strict comparison: the first record at the minimum distance wins
            if nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((station, dist));
            }
        }

        let (station, dist) = nearest?;
        Some(StationMatch::new(
            station.name.clone(),
            round_km(dist),
            self.lines_for(station.name.as_str()),
        ))
    }
}
