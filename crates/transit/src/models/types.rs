//! Core data types for station lookups.

use crate::identifiers::*;

// ============================================================================
// Data Structures
// ============================================================================

/// Result of a nearest-station lookup.
///
/// `distance_km` is rounded to two decimals; the comparison that produced it
/// was done at full precision.
#[derive(Clone, Debug, PartialEq)]
pub struct StationMatch {
    pub station: StationIdentifier,
    pub distance_km: f64,
    /// All lines serving `station`, `;`-joined in first-seen order
    pub lines: String,
}

impl StationMatch {
    pub fn new(station: StationIdentifier, distance_km: f64, lines: String) -> Self {
        Self {
            station,
            distance_km,
            lines,
        }
    }

    pub fn is_within(&self, max_distance_km: f64) -> bool {
        self.distance_km <= max_distance_km
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Station directory is empty")]
    EmptyDirectory,

    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
