//! Alert generation: match events to stations, filter, classify, deduplicate.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use surge_transit::{StationDirectory, StationMatch, TransitError};
use tracing::{debug, info};

use crate::event::{Event, Listed};
use crate::impact::{classify, ImpactLevel};
use crate::source::{EventSource, FetchError};

/// Default radius around a station within which an event raises an alert
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 3.0;

// ============================================================================
// Alert
// ============================================================================

/// An event close enough to a station to affect its ridership.
///
/// Field order is the presentation column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    pub event: String,
    pub date: Option<Listed<NaiveDate>>,
    pub time: Option<Listed<NaiveTime>>,
    pub venue: String,
    pub nearest_station: String,
    pub lines: String,
    pub distance_km: f64,
    pub impact_level: ImpactLevel,
}

impl Alert {
    /// Column headers, in field order
    pub const COLUMNS: [&'static str; 8] = [
        "Event",
        "Date",
        "Time",
        "Venue",
        "Nearest Station",
        "Lines",
        "Distance (km)",
        "Impact Level",
    ];

    pub fn new(event: &Event, matched: StationMatch, impact_level: ImpactLevel) -> Self {
        Self {
            event: event.name.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            venue: event.venue.clone(),
            nearest_station: matched.station.to_string(),
            lines: matched.lines,
            distance_km: matched.distance_km,
            impact_level,
        }
    }

    /// Display cells matching [`Alert::COLUMNS`]
    pub fn row(&self) -> [String; 8] {
        [
            self.event.clone(),
            self.date.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            self.time.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            self.venue.clone(),
            self.nearest_station.clone(),
            self.lines.clone(),
            format!("{:.2}", self.distance_km),
            self.impact_level.to_string(),
        ]
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// No stations to match against; the station source is misconfigured
    #[error("station directory is empty")]
    EmptyDirectory,

    #[error("max distance must be a non-negative number of km, got {0}")]
    InvalidMaxDistance(f64),

    /// An event without usable coordinates got past the source
    #[error("event {name:?} has unusable coordinates")]
    InvalidEvent {
        name: String,
        #[source]
        source: TransitError,
    },

    #[error("failed to fetch events")]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, AlertError>;

// ============================================================================
// Generation
// ============================================================================

/// Build the alert list for a batch of events.
///
/// Keeps events whose nearest station is at most `max_distance_km` away
/// (inclusive, on the rounded distance) and at most one alert per
/// name/date/time, the first in input order.
pub fn generate_alerts<D>(events: &[Event], directory: &D, max_distance_km: f64) -> Result<Vec<Alert>>
where
    D: StationDirectory + ?Sized,
{
    if events.is_empty() {
        return Ok(Vec::new());
    }

    if !max_distance_km.is_finite() || max_distance_km < 0.0 {
        return Err(AlertError::InvalidMaxDistance(max_distance_km));
    }

    if directory.is_empty() {
        return Err(AlertError::EmptyDirectory);
    }

    let mut seen = HashSet::new();
    let mut alerts = Vec::new();

    for event in events {
        let location = event.location().map_err(|source| AlertError::InvalidEvent {
            name: event.name.clone(),
            source,
        })?;

        let matched = directory
            .nearest_station(location)
            .ok_or(AlertError::EmptyDirectory)?;

        if !matched.is_within(max_distance_km) {
            debug!(
                event = %event.name,
                station = %matched.station,
                distance_km = matched.distance_km,
                "event too far from any station"
            );
            continue;
        }

        if !seen.insert(event.key()) {
            debug!(event = %event.name, "duplicate listing skipped");
            continue;
        }

        let impact = classify(&event.venue);
        debug!(
            event = %event.name,
            station = %matched.station,
            distance_km = matched.distance_km,
            %impact,
            "event matched"
        );
        alerts.push(Alert::new(event, matched, impact));
    }

    info!(
        events = events.len(),
        alerts = alerts.len(),
        max_distance_km,
        "generated alerts"
    );
    Ok(alerts)
}

/// Fetch a batch from `source` and generate its alerts.
///
/// A failed fetch is returned as [`AlertError::Fetch`], never as an empty list.
pub async fn fetch_and_generate<S, D>(
    source: &S,
    directory: &D,
    max_distance_km: f64,
) -> Result<Vec<Alert>>
where
    S: EventSource + ?Sized,
    D: StationDirectory + ?Sized,
{
    let events = source.fetch_events().await?;
    generate_alerts(&events, directory, max_distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::event;
    use approx::assert_abs_diff_eq;
    use surge_transit::{StaticStationDirectory, StationRecord};

    fn directory() -> StaticStationDirectory {
        StaticStationDirectory::from_records(vec![
            StationRecord::new("Central", "S1", 52.3759, 9.7320).unwrap(),
            StationRecord::new("Central", "S2", 52.3759, 9.7320).unwrap(),
            StationRecord::new("North", "S3", 52.4000, 9.7000).unwrap(),
        ])
        .unwrap()
    }

    /// Empty-by-construction directory for the configuration error path
    struct NoStations;

    impl StationDirectory for NoStations {
        fn all_stations(&self) -> Vec<std::sync::Arc<dyn surge_transit::TransitStation>> {
            Vec::new()
        }

        fn len(&self) -> usize {
            0
        }

        fn lines_for(&self, _station_name: &str) -> String {
            String::new()
        }

        fn nearest_station(&self, _point: geo::Point) -> Option<StationMatch> {
            None
        }
    }

    #[test]
    fn test_event_next_to_central() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];
        let alerts = generate_alerts(&events, &directory(), DEFAULT_MAX_DISTANCE_KM).unwrap();

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.event, "Konzert");
        assert_eq!(alert.nearest_station, "Central");
        assert_eq!(alert.lines, "S1;S2");
        assert_abs_diff_eq!(alert.distance_km, 0.01, epsilon = 1e-9);
        assert_eq!(alert.impact_level, ImpactLevel::High);
    }

    #[test]
    fn test_far_event_dropped() {
        // ~5 km south of both stations
        let events = vec![event("Open Air", "Stadtpark", 52.3310, 9.7320)];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();

        assert!(alerts.is_empty());
    }

    #[test]
    fn test_every_alert_within_threshold() {
        let events = vec![
            event("A", "Arena", 52.3760, 9.7321),
            event("B", "Halle", 52.3900, 9.7100),
            event("C", "Park", 52.3500, 9.7320),
            event("D", "Club", 52.3310, 9.7320),
            event("E", "Theater", 52.4200, 9.6500),
        ];

        for max in [0.5, 1.0, 2.0, 3.0, 5.0] {
            let alerts = generate_alerts(&events, &directory(), max).unwrap();
            assert!(alerts.iter().all(|a| a.distance_km <= max));
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];

        let alerts = generate_alerts(&events, &directory(), 0.01).unwrap();
        assert_eq!(alerts.len(), 1);

        let alerts = generate_alerts(&events, &directory(), 0.0).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let events = vec![
            event("Konzert", "Arena Nord", 52.3760, 9.7321),
            event("Konzert", "Kleines Theater", 52.3990, 9.7010),
        ];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].venue, "Arena Nord");
        assert_eq!(alerts[0].nearest_station, "Central");
    }

    #[test]
    fn test_dedup_applies_after_distance_filter() {
        let events = vec![
            event("Konzert", "Far Arena", 52.3310, 9.7320),
            event("Konzert", "Near Halle", 52.3760, 9.7321),
        ];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].venue, "Near Halle");
    }

    #[test]
    fn test_same_name_different_time_kept() {
        let first = event("Konzert", "Arena Nord", 52.3760, 9.7321);
        let mut second = first.clone();
        second.time = NaiveTime::from_hms_opt(15, 0, 0).map(Listed::Parsed);

        let alerts = generate_alerts(&[first, second], &directory(), 3.0).unwrap();
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn test_unparsed_dates_stay_distinct() {
        let mut tba = event("Konzert", "Arena Nord", 52.3760, 9.7321);
        tba.date = Some(Listed::Raw("TBA".into()));
        let mut tbd = tba.clone();
        tbd.date = Some(Listed::Raw("TBD".into()));
        let repeat = tba.clone();

        let alerts = generate_alerts(&[tba, tbd, repeat], &directory(), 3.0).unwrap();

        let dates: Vec<_> = alerts.iter().map(|a| a.row()[1].clone()).collect();
        assert_eq!(dates, ["TBA", "TBD"]);
    }

    #[test]
    fn test_empty_events_short_circuit() {
        let alerts = generate_alerts(&[], &directory(), 3.0).unwrap();
        assert!(alerts.is_empty());

        // Nothing to match, so an empty directory is not consulted either
        let alerts = generate_alerts(&[], &NoStations, 3.0).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_empty_directory_is_configuration_error() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];
        let err = generate_alerts(&events, &NoStations, 3.0).unwrap_err();

        assert!(matches!(err, AlertError::EmptyDirectory));
    }

    #[test]
    fn test_invalid_coordinates_fail_loudly() {
        let events = vec![
            event("Good", "Arena Nord", 52.3760, 9.7321),
            event("Broken", "Arena Süd", f64::NAN, 9.7321),
        ];
        let err = generate_alerts(&events, &directory(), 3.0).unwrap_err();

        match err {
            AlertError::InvalidEvent { name, .. } => assert_eq!(name, "Broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_max_distance() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];

        assert!(matches!(
            generate_alerts(&events, &directory(), -1.0),
            Err(AlertError::InvalidMaxDistance(_))
        ));
        assert!(matches!(
            generate_alerts(&events, &directory(), f64::NAN),
            Err(AlertError::InvalidMaxDistance(_))
        ));
    }

    #[test]
    fn test_output_preserves_input_order() {
        let events = vec![
            event("Zweites", "Theater", 52.3990, 9.7010),
            event("Erstes", "Arena", 52.3760, 9.7321),
        ];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();

        let names: Vec<_> = alerts.iter().map(|a| a.event.as_str()).collect();
        assert_eq!(names, ["Zweites", "Erstes"]);
        assert_eq!(alerts[0].nearest_station, "North");
        assert_eq!(alerts[0].impact_level, ImpactLevel::Medium);
    }

    #[test]
    fn test_row_matches_columns() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();

        assert_eq!(
            alerts[0].row(),
            [
                "Konzert".to_string(),
                "2025-06-14".into(),
                "20:00:00".into(),
                "Arena Nord".into(),
                "Central".into(),
                "S1;S2".into(),
                "0.01".into(),
                "HIGH".into(),
            ]
        );
    }

    #[test]
    fn test_serialized_field_order() {
        let events = vec![event("Konzert", "Arena Nord", 52.3760, 9.7321)];
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();
        let json = serde_json::to_string(&alerts[0]).unwrap();

        assert_eq!(
            json,
            r#"{"event":"Konzert","date":"2025-06-14","time":"20:00:00","venue":"Arena Nord","nearest_station":"Central","lines":"S1;S2","distance_km":0.01,"impact_level":"HIGH"}"#
        );
    }
}
