//! # surge-transit
//!
//! Station directory and nearest-station matching for event surge alerts.
//!
//! ## Features
//!
//! - **Station directory**: station/line rows with per-station line lookup
//! - **Nearest station**: linear scan with Haversine distances in kilometers
//! - **CSV loading**: parse station tables (`loader` feature)
//!
//! ## Example
//!
//! ```
//! use surge_transit::prelude::*;
//! use geo::Point;
//!
//! let directory = StaticStationDirectory::from_records(vec![
//!     StationRecord::new("Central", "S1", 52.3759, 9.7320).unwrap(),
//!     StationRecord::new("Central", "S2", 52.3759, 9.7320).unwrap(),
//!     StationRecord::new("North", "S3", 52.4000, 9.7000).unwrap(),
//! ])
//! .unwrap();
//!
//! let nearest = directory.nearest_station(Point::new(9.7321, 52.3760)).unwrap();
//! assert_eq!(nearest.station.as_str(), "Central");
//! assert_eq!(nearest.lines, "S1;S2");
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::provider::{StaticStationDirectory, StationRecord};
    pub use crate::spatial::{haversine_distance, haversine_km};
}

pub use prelude::*;
