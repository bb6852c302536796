use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::collections::HashSet;
use std::path::Path;

use surge_core::{Alert, Event};
use surge_transit::StationDirectory;

/// Render alerts as a left-aligned text table with a header row
pub fn render_table(alerts: &[Alert]) -> String {
    let rows: Vec<[String; 8]> = alerts.iter().map(Alert::row).collect();

    let mut widths = Alert::COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, Alert::COLUMNS.iter().copied(), &widths);
    push_row(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Point feature at `latitude`/`longitude` with the given properties
fn point_feature(latitude: f64, longitude: f64, properties: serde_json::Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build a map layer with one point per distinct station and one per event.
///
/// Events that raised an alert carry its station, distance and impact level.
pub fn map_layer(directory: &dyn StationDirectory, events: &[Event], alerts: &[Alert]) -> FeatureCollection {
    let mut features = Vec::new();

    let stations = directory.all_stations();
    let mut seen = HashSet::new();
    for station in &stations {
        if !seen.insert(station.name()) {
            continue;
        }
        let mut properties = serde_json::Map::new();
        properties.insert("feature_type".to_string(), serde_json::json!("station"));
        properties.insert("name".to_string(), serde_json::json!(station.name().as_str()));
        properties.insert(
            "lines".to_string(),
            serde_json::json!(directory.lines_for(station.name().as_str())),
        );
        features.push(point_feature(station.latitude(), station.longitude(), properties));
    }

    for event in events {
        let mut properties = serde_json::Map::new();
        properties.insert("feature_type".to_string(), serde_json::json!("event"));
        properties.insert("name".to_string(), serde_json::json!(event.name));
        properties.insert("venue".to_string(), serde_json::json!(event.venue));
        properties.insert("date".to_string(), serde_json::json!(event.date));

        let alert = alerts.iter().find(|a| {
            a.event == event.name && a.date == event.date && a.time == event.time && a.venue == event.venue
        });
        if let Some(alert) = alert {
            properties.insert("nearest_station".to_string(), serde_json::json!(alert.nearest_station));
            properties.insert("distance_km".to_string(), serde_json::json!(alert.distance_km));
            properties.insert("impact_level".to_string(), serde_json::json!(alert.impact_level));
        }

        features.push(point_feature(event.latitude, event.longitude, properties));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write the map layer to a GeoJSON file
pub fn write_map_geojson(
    directory: &dyn StationDirectory,
    events: &[Event],
    alerts: &[Alert],
    path: &Path,
) -> Result<()> {
    let geojson = GeoJson::FeatureCollection(map_layer(directory, events, alerts));
    std::fs::write(path, geojson.to_string())
        .with_context(|| format!("Failed to write GeoJSON to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surge_core::generate_alerts;
    use surge_transit::{StaticStationDirectory, StationRecord};

    fn directory() -> StaticStationDirectory {
        StaticStationDirectory::from_records(vec![
            StationRecord::new("Central", "S1", 52.3759, 9.7320).unwrap(),
            StationRecord::new("Central", "S2", 52.3759, 9.7320).unwrap(),
            StationRecord::new("North", "S3", 52.4000, 9.7000).unwrap(),
        ])
        .unwrap()
    }

    fn events() -> Vec<Event> {
        vec![
            Event {
                name: "Konzert".into(),
                genre: "Music".into(),
                venue: "Arena Nord".into(),
                date: None,
                time: None,
                latitude: 52.3760,
                longitude: 9.7321,
            },
            Event {
                name: "Weit weg".into(),
                genre: "Music".into(),
                venue: "Stadtpark".into(),
                date: None,
                time: None,
                latitude: 52.3310,
                longitude: 9.7320,
            },
        ]
    }

    #[test]
    fn test_render_table() {
        let alerts = generate_alerts(&events(), &directory(), 3.0).unwrap();
        let table = render_table(&alerts);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Event    Date  Time  Venue       Nearest Station  Lines"));
        assert!(lines[0].ends_with("Impact Level"));
        assert!(lines[1].starts_with("-------  ----"));
        assert!(lines[2].starts_with("Konzert"));
        assert!(lines[2].contains("S1;S2"));
        assert!(lines[2].ends_with("HIGH"));
    }

    #[test]
    fn test_render_empty_table_is_header_only() {
        assert_eq!(render_table(&[]).lines().count(), 2);
    }

    #[test]
    fn test_map_layer() {
        let events = events();
        let alerts = generate_alerts(&events, &directory(), 3.0).unwrap();
        let layer = map_layer(&directory(), &events, &alerts);

        // Two distinct stations, two events
        assert_eq!(layer.features.len(), 4);

        let central = &layer.features[0];
        let props = central.properties.as_ref().unwrap();
        assert_eq!(props["lines"], "S1;S2");
        match &central.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![9.7320, 52.3759]),
            other => panic!("expected point, got {:?}", other),
        }

        let near = layer.features[2].properties.as_ref().unwrap();
        assert_eq!(near["impact_level"], "HIGH");
        assert_eq!(near["nearest_station"], "Central");

        let far = layer.features[3].properties.as_ref().unwrap();
        assert!(!far.contains_key("impact_level"));
    }
}
