//! Keyword filter deciding which listings are worth matching at all.

use serde::Deserialize;

/// Keeps an event when its genre contains one of `genres` or its venue
/// contains one of `venues`, ignoring case.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelevanceFilter {
    pub genres: Vec<String>,
    pub venues: Vec<String>,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self {
            genres: ["music", "sports", "arts"].map(String::from).to_vec(),
            venues: ["stadion", "arena", "theater", "park", "halle"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl RelevanceFilter {
    pub fn new(genres: Vec<String>, venues: Vec<String>) -> Self {
        Self { genres, venues }
    }

    pub fn is_relevant(&self, genre: &str, venue: &str) -> bool {
        contains_any(genre, &self.genres) || contains_any(venue, &self.venues)
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&k.to_lowercase()))
}
