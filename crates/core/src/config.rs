//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. SURGE_CONFIG environment variable
//! 3. Built-in defaults (Hannover, 3 km)
//!
//! Every section and field is optional; missing values take their defaults.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::alert::DEFAULT_MAX_DISTANCE_KM;
use crate::source::RelevanceFilter;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "SURGE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Events farther than this from their nearest station raise no alert
    pub max_distance_km: f64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TicketmasterConfig {
    pub base_url: String,
    pub city: String,
    pub country_code: String,
    /// Page size requested from the API (1..=200)
    pub size: u32,
    pub timeout_secs: u64,
}

impl Default for TicketmasterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.ticketmaster.com/discovery/v2/events.json".into(),
            city: "Hannover".into(),
            country_code: "DE".into(),
            size: 50,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alerts: AlertsConfig,
    pub relevance: RelevanceFilter,
    pub ticketmaster: TicketmasterConfig,
}

impl Config {
    /// Load configuration from a specific file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else `SURGE_CONFIG`, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)),
            _ => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.alerts.max_distance_km;
        if !max.is_finite() || max < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "alerts.max_distance_km must be a non-negative number, got {}",
                max
            )));
        }

        if !(1..=200).contains(&self.ticketmaster.size) {
            return Err(ConfigError::Invalid(format!(
                "ticketmaster.size must be between 1 and 200, got {}",
                self.ticketmaster.size
            )));
        }

        if self.ticketmaster.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ticketmaster.timeout_secs must be positive".into()));
        }

        Ok(())
    }
}
