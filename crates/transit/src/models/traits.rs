//! Core traits for station entities.
//!
//! These traits define the public interface for station data.
//! Implementations can be in-memory, database-backed, or remote.

use geo::Point;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;

// ============================================================================
// Core Entity Traits
// ============================================================================

/// One row of the station table: a station name served by a single line.
///
/// A station served by several lines appears once per line.
pub trait TransitStation: Send + Sync {
    fn name(&self) -> &StationIdentifier;
    fn line(&self) -> &LineIdentifier;

    /// x = longitude, y = latitude
    fn location(&self) -> Point;

    fn latitude(&self) -> f64 {
        self.location().y()
    }

    fn longitude(&self) -> f64 {
        self.location().x()
    }
}

// ============================================================================
// Directory Trait
// ============================================================================

/// Read-only station lookup shared across a whole run.
pub trait StationDirectory: Send + Sync {
    // ---- Collections ----
    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>>;

    /// Number of station records (not distinct names)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- Lookups ----

    /// `;`-joined unique lines for every record named `station_name`,
    /// in order of first occurrence. Empty string when the name is unknown.
    fn lines_for(&self, station_name: &str) -> String;

    // ---- Spatial queries ----

    /// Closest station record to `point`, with all lines of that station.
    ///
    /// Returns `None` only when the directory is empty.
    fn nearest_station(&self, point: Point) -> Option<StationMatch>;
}
