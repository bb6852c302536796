//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula for great-circle distances on a spherical Earth.

use geo::Point;

use crate::models::types::{Result, TransitError};

/// Mean Earth radius used for all distances, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards asin against a drifting a few ulps above 1 for antipodes
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    haversine_km(p1.y(), p1.x(), p2.y(), p2.x())
}

/// Round a distance to two decimal places (10 m resolution)
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Build a point from latitude/longitude degrees, rejecting values that are
/// not finite or lie outside -90..=90 / -180..=180.
pub fn point_from_degrees(latitude: f64, longitude: f64) -> Result<Point> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);

    if !valid {
        return Err(TransitError::InvalidCoordinates { latitude, longitude });
    }

    Ok(Point::new(longitude, latitude))
}
