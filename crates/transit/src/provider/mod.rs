//! Station data providers.

#[cfg(feature = "loader")]
pub mod loader;
pub mod static_provider;

#[cfg(feature = "loader")]
pub use loader::{load_stations, read_stations};
pub use static_provider::{StaticStationDirectory, StationRecord, LINE_SEPARATOR};
