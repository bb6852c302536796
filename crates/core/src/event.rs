//! Public events as delivered by an event source.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use geo::Point;
use serde::{Deserialize, Serialize};
use surge_transit::spatial::point_from_degrees;

/// A date or time as listed upstream.
///
/// Values that do not parse (`"TBA"`, `"TBD"`, ...) keep their text, so two
/// listings with different placeholders stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listed<T> {
    Parsed(T),
    Raw(String),
}

impl<T> Listed<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Listed::Parsed(v) => Some(v),
            Listed::Raw(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Listed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listed::Parsed(v) => fmt::Display::fmt(v, f),
            Listed::Raw(s) => f.write_str(s),
        }
    }
}

/// A public event at a venue with known coordinates.
///
/// Sources only emit events whose venue has both coordinates; the date and
/// time are optional because listings frequently leave them open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub genre: String,
    pub venue: String,
    pub date: Option<Listed<NaiveDate>>,
    pub time: Option<Listed<NaiveTime>>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Identity of an event listing for deduplication
pub type EventKey<'a> = (&'a str, Option<&'a Listed<NaiveDate>>, Option<&'a Listed<NaiveTime>>);

impl Event {
    /// Venue location, validated
    pub fn location(&self) -> surge_transit::Result<Point> {
        point_from_degrees(self.latitude, self.longitude)
    }

    /// Same show listed twice (e.g. once per ticket category) shares this key
    pub fn key(&self) -> EventKey<'_> {
        (self.name.as_str(), self.date.as_ref(), self.time.as_ref())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn event(name: &str, venue: &str, latitude: f64, longitude: f64) -> Event {
        Event {
            name: name.into(),
            genre: "Music".into(),
            venue: venue.into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).map(Listed::Parsed),
            time: NaiveTime::from_hms_opt(20, 0, 0).map(Listed::Parsed),
            latitude,
            longitude,
        }
    }
}
