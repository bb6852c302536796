//! Distance and coordinate utilities.

pub mod queries;

pub use queries::{haversine_distance, haversine_km, point_from_degrees, round_km, EARTH_RADIUS_KM};
