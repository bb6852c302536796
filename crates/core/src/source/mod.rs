//! Event sources.
//!
//! External crates implement [`EventSource`] to feed events from other
//! listings; [`ticketmaster`] provides the Discovery API client.

pub mod relevance;
pub mod ticketmaster;

use std::future::Future;
use std::pin::Pin;

use crate::event::Event;

pub use relevance::RelevanceFilter;
pub use ticketmaster::TicketmasterClient;

/// Fetch one batch of candidate events.
///
/// Implementations return only events with venue coordinates that pass their
/// relevance filter. An empty batch is a successful fetch; transport, status
/// and decode problems are errors.
pub trait EventSource: Send + Sync {
    fn fetch_events<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Event>, FetchError>> + Send + 'a>>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event source answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed event listing: {0}")]
    Decode(#[from] serde_json::Error),
}
