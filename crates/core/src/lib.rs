//! # surge-core
//!
//! Warns transit operators about public events close to their stations.
//!
//! Events come from an [`EventSource`](source::EventSource), are matched to the
//! nearest station of a [`StationDirectory`](surge_transit::StationDirectory),
//! filtered by distance, classified by venue and deduplicated into [`Alert`]s.

pub mod alert;
pub mod config;
pub mod event;
pub mod impact;
pub mod source;

pub use alert::{fetch_and_generate, generate_alerts, Alert, AlertError, DEFAULT_MAX_DISTANCE_KM};
pub use config::{Config, ConfigError};
pub use event::{Event, Listed};
pub use impact::{classify, ImpactLevel};
pub use source::{EventSource, FetchError, RelevanceFilter, TicketmasterClient};

// Re-export the station side from the transit crate
pub use surge_transit as transit;
