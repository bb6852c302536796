//! Ticketmaster Discovery API v2 event source.
//!
//! Only the handful of fields needed for matching are read; everything else
//! in the listing is ignored.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use surge_transit::spatial::point_from_degrees;
use tracing::{debug, info, warn};

use crate::config::TicketmasterConfig;
use crate::event::{Event, Listed};
use crate::source::{EventSource, FetchError, RelevanceFilter};

/// Longest error body kept in [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 512;

// ============================================================================
// Client
// ============================================================================

pub struct TicketmasterClient {
    http: reqwest::Client,
    config: TicketmasterConfig,
    api_key: String,
    filter: RelevanceFilter,
}

impl TicketmasterClient {
    pub fn new(
        config: TicketmasterConfig,
        api_key: impl Into<String>,
        filter: RelevanceFilter,
    ) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        // Client is reused for the connection pool
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            api_key,
            filter,
        })
    }

    /// Full request URL, including the API key
    pub fn request_url(&self) -> Result<reqwest::Url, FetchError> {
        let size = self.config.size.to_string();
        reqwest::Url::parse_with_params(
            &self.config.base_url,
            &[
                ("apikey", self.api_key.as_str()),
                ("city", self.config.city.as_str()),
                ("countryCode", self.config.country_code.as_str()),
                ("size", size.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", self.config.base_url, e)))
    }

    pub async fn fetch(&self) -> Result<Vec<Event>, FetchError> {
        let url = self.request_url()?;
        debug!(
            city = %self.config.city,
            country = %self.config.country_code,
            size = self.config.size,
            "requesting events"
        );

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(FetchError::Status { status, body });
        }

        parse_events(&body, &self.filter)
    }
}

impl EventSource for TicketmasterClient {
    fn fetch_events<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Event>, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch())
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedEvents {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    classifications: Vec<Classification>,
    dates: Option<Dates>,
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedVenues>,
}

#[derive(Debug, Deserialize)]
struct Classification {
    segment: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Dates {
    start: Option<Start>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Start {
    local_date: Option<String>,
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedVenues {
    #[serde(default)]
    venues: Vec<RawVenue>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    #[serde(default)]
    name: String,
    location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    latitude: Option<Coordinate>,
    longitude: Option<Coordinate>,
}

/// The API sends coordinates as strings; accept plain numbers too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(v) => Some(*v),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse a Discovery API response body into relevant, located events.
///
/// A body without `_embedded` is a successful empty result. Listings
/// without a venue, without valid venue coordinates, or failing `filter`
/// are dropped.
pub fn parse_events(body: &str, filter: &RelevanceFilter) -> Result<Vec<Event>, FetchError> {
    let response: DiscoveryResponse = serde_json::from_str(body)?;

    let raw_events = response.embedded.map(|e| e.events).unwrap_or_default();
    let total = raw_events.len();

    let events: Vec<Event> = raw_events
        .into_iter()
        .filter_map(|raw| into_event(raw, filter))
        .collect();

    info!(listed = total, kept = events.len(), "parsed event listing");
    Ok(events)
}

fn into_event(raw: RawEvent, filter: &RelevanceFilter) -> Option<Event> {
    let Some(venue) = raw.embedded.and_then(|e| e.venues.into_iter().next()) else {
        warn!(event = %raw.name, "listing has no venue, skipped");
        return None;
    };

    let genre = raw
        .classifications
        .first()
        .and_then(|c| c.segment.as_ref())
        .map(|s| s.name.clone())
        .unwrap_or_default();

    let coordinates = venue.location.as_ref().and_then(|l| {
        Some((l.latitude.as_ref()?.value()?, l.longitude.as_ref()?.value()?))
    });
    let Some((latitude, longitude)) = coordinates else {
        debug!(event = %raw.name, venue = %venue.name, "venue has no coordinates, skipped");
        return None;
    };
    if let Err(e) = point_from_degrees(latitude, longitude) {
        warn!(event = %raw.name, venue = %venue.name, error = %e, "skipped");
        return None;
    }

    if !filter.is_relevant(&genre, &venue.name) {
        debug!(event = %raw.name, genre = %genre, venue = %venue.name, "not relevant, skipped");
        return None;
    }

    let start = raw.dates.and_then(|d| d.start);
    let date = start
        .as_ref()
        .and_then(|s| s.local_date.as_deref())
        .and_then(|d| parse_field::<NaiveDate>(&raw.name, "localDate", d));
    let time = start
        .as_ref()
        .and_then(|s| s.local_time.as_deref())
        .and_then(|t| parse_field::<NaiveTime>(&raw.name, "localTime", t));

    Some(Event {
        name: raw.name,
        genre,
        venue: venue.name,
        date,
        time,
        latitude,
        longitude,
    })
}

/// Parse a listed date/time, keeping the text when it does not parse
fn parse_field<T: std::str::FromStr>(event: &str, field: &str, value: &str) -> Option<Listed<T>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(v) => Some(Listed::Parsed(v)),
        Err(_) => {
            debug!(event, field, value, "kept unparsed value");
            Some(Listed::Raw(value.to_string()))
        }
    }
}
