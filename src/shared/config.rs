//! Process configuration, loaded from environment variables (a `.env` file is
//! honored when present).

use std::env;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{0} has an invalid value: {1}")]
    InvalidVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_id: String,
    pub api_key: String,
    pub storage_bucket: String,
    /// How often collection and document listeners re-fetch.
    pub poll_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let poll_ms = match env::var("SNAPSHOT_POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidVar("SNAPSHOT_POLL_INTERVAL_MS", raw))?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };

        Ok(Self {
            project_id: require("FIREBASE_PROJECT_ID")?,
            api_key: require("FIREBASE_API_KEY")?,
            storage_bucket: require("FIREBASE_STORAGE_BUCKET")?,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
