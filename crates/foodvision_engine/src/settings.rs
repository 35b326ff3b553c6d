use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {field} url {value:?}: {message}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        message: String,
    },
    #[error("poll interval must be at least 1 ms")]
    ZeroPollInterval,
    #[error("max poll attempts must be at least 1 when set")]
    ZeroPollCeiling,
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Endpoints and timing for one client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub upload_url: String,
    pub status_url: String,
    pub enrichment_url: String,
    pub enrichment_api_key: Option<String>,
    pub enrichment_data_type: String,
    pub poll_interval_ms: u64,
    /// `None` polls until the session is reset.
    pub max_poll_attempts: Option<u32>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            upload_url: "http://127.0.0.1:3000/image-upload".to_string(),
            status_url: "http://127.0.0.1:3000/status".to_string(),
            enrichment_url: "https://api.nal.usda.gov/fdc/v1/foods/search".to_string(),
            enrichment_api_key: Some("DEMO_KEY".to_string()),
            enrichment_data_type: "Foundation".to_string(),
            poll_interval_ms: 3_000,
            max_poll_attempts: Some(200),
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject settings that would make the session unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("upload_url", &self.upload_url)?;
        parse_url("status_url", &self.status_url)?;
        parse_url("enrichment_url", &self.enrichment_url)?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.max_poll_attempts == Some(0) {
            return Err(ConfigError::ZeroPollCeiling);
        }
        Ok(())
    }
}

pub(crate) fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        message: err.to_string(),
    })
}
