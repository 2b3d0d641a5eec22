//! Outbound publisher configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Outbound publisher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    /// Which publisher adapter to use
    #[serde(default)]
    pub backend: PublisherBackend,

    /// Dapr sidecar HTTP endpoint
    #[serde(default = "default_dapr_http_endpoint")]
    pub dapr_http_endpoint: String,

    /// Dapr sidecar API token
    pub dapr_api_token: Option<SecretString>,

    /// Redis connection URL (redis backend only)
    pub redis_url: Option<String>,

    /// Publish timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Publisher backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublisherBackend {
    #[default]
    Dapr,
    Redis,
}

impl PublisherConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Dapr API token, if one is configured and non-empty
    pub fn dapr_api_token(&self) -> Option<&str> {
        self.dapr_api_token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .filter(|t| !t.is_empty())
    }

    /// Validate publisher configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        match self.backend {
            PublisherBackend::Dapr => {
                if !self.dapr_http_endpoint.starts_with("http://")
                    && !self.dapr_http_endpoint.starts_with("https://")
                {
                    return Err(ValidationError::InvalidDaprEndpoint);
                }
            }
            PublisherBackend::Redis => {
                let url = self
                    .redis_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or(ValidationError::MissingRequired("PUBLISHER__REDIS_URL"))?;
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
            }
        }
        Ok(())
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            backend: PublisherBackend::default(),
            dapr_http_endpoint: default_dapr_http_endpoint(),
            dapr_api_token: None,
            redis_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Sidecar endpoint used when none is configured explicitly
pub(crate) fn default_dapr_http_endpoint() -> String {
    "http://localhost:3500".to_string()
}

fn default_timeout() -> u64 {
    5
}
