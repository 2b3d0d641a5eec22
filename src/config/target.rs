//! Outbound target configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::TargetFormat;
use crate::ports::Destination;

/// Outbound target configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Pub/sub component converted events are published to
    #[serde(default = "default_pubsub_name")]
    pub pubsub_name: String,

    /// Topic within the pub/sub component
    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    /// Target format name (`json`, `xml` or `csv`, any case)
    #[serde(default = "default_format")]
    pub format: String,
}

impl TargetConfig {
    /// Resolve the configured format name
    pub fn format(&self) -> Result<TargetFormat, ValidationError> {
        self.format
            .trim()
            .parse()
            .map_err(|_| ValidationError::UnsupportedFormat(self.format.clone()))
    }

    /// Publish destination built from the configured names
    pub fn destination(&self) -> Destination {
        Destination::new(self.pubsub_name.trim(), self.topic_name.trim())
    }

    /// Validate target configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pubsub_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TARGET__PUBSUB_NAME"));
        }
        if self.topic_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TARGET__TOPIC_NAME"));
        }
        self.format()?;
        Ok(())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            pubsub_name: default_pubsub_name(),
            topic_name: default_topic_name(),
            format: default_format(),
        }
    }
}

fn default_pubsub_name() -> String {
    "fanout-queue-target-event-binding".to_string()
}

fn default_topic_name() -> String {
    "events".to_string()
}

fn default_format() -> String {
    "json".to_string()
}
