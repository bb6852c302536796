//! Venue based impact classification.

use serde::{Deserialize, Serialize};

/// Expected effect of an event on ridership at nearby stations
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// Keyword tiers, checked top-down. The first tier with a keyword contained
/// in the venue name decides; venues matching none are [`ImpactLevel::Low`].
pub const IMPACT_RULES: &[(ImpactLevel, &[&str])] = &[
    (ImpactLevel::High, &["arena", "stadion", "stadium", "messe"]),
    (ImpactLevel::Medium, &["theater", "halle", "park"]),
];

/// Classify a venue by case-insensitive substring match against [`IMPACT_RULES`]
pub fn classify(venue: &str) -> ImpactLevel {
    let venue = venue.to_lowercase();

    IMPACT_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| venue.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or(ImpactLevel::Low)
}
