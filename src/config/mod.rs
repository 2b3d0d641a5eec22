//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONVERTER` prefix and nested values use double underscores as separators.
//! Every setting has a default, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use queue_format_converter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {}", config.server.socket_addr().unwrap());
//! ```

mod binding;
mod error;
mod publisher;
mod server;
mod target;

pub use binding::BindingConfig;
pub use error::{ConfigError, ValidationError};
pub use publisher::{PublisherBackend, PublisherConfig};
pub use server::ServerConfig;
pub use target::TargetConfig;

use serde::Deserialize;

use crate::domain::TargetFormat;

/// Port variable the Dapr runtime sets for its sidecar HTTP API.
const DAPR_HTTP_PORT: &str = "DAPR_HTTP_PORT";

/// Token variable the Dapr runtime sets when API token auth is enabled.
const DAPR_API_TOKEN: &str = "DAPR_API_TOKEN";

/// Unprefixed variables read by earlier deployments, and the key each one
/// falls back to. A `CONVERTER__*` value for the same key wins.
const UNPREFIXED_VARS: [(&str, &str); 5] = [
    ("ADDRESS", "server.address"),
    ("SOURCE_BINDING", "binding.source"),
    ("TARGET_PUBSUB_NAME", "target.pubsub_name"),
    ("TARGET_TOPIC_NAME", "target.topic_name"),
    ("TARGET_TOPIC_FORMAT", "target.format"),
];

/// Root application configuration
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener configuration (address, logging, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Inbound binding configuration
    #[serde(default)]
    pub binding: BindingConfig,

    /// Outbound destination and format
    #[serde(default)]
    pub target: TargetConfig,

    /// Outbound publisher backend
    #[serde(default)]
    pub publisher: PublisherConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONVERTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONVERTER__SERVER__ADDRESS=:60010` -> `server.address = ":60010"`
    /// - `CONVERTER__TARGET__FORMAT=csv` -> `target.format = "csv"`
    ///
    /// `DAPR_HTTP_PORT` and `DAPR_API_TOKEN`, as injected by the Dapr runtime,
    /// are used when the corresponding `CONVERTER__PUBLISHER__*` value is unset.
    /// Likewise `ADDRESS`, `SOURCE_BINDING`, `TARGET_PUBSUB_NAME`,
    /// `TARGET_TOPIC_NAME` and `TARGET_TOPIC_FORMAT` (trimmed) fill in the
    /// listen address, binding and target settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: config::Map<String, String> = vars.into_iter().collect();

        let dapr_endpoint = vars
            .get(DAPR_HTTP_PORT)
            .map(|port| format!("http://localhost:{}", port.trim()))
            .unwrap_or_else(publisher::default_dapr_http_endpoint);

        let mut builder = config::Config::builder()
            .set_default("publisher.dapr_http_endpoint", dapr_endpoint)?;

        if let Some(token) = vars.get(DAPR_API_TOKEN) {
            builder = builder.set_default("publisher.dapr_api_token", token.clone())?;
        }

        for (name, key) in UNPREFIXED_VARS {
            if let Some(value) = vars.get(name) {
                builder = builder.set_default(key, value.trim())?;
            }
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("CONVERTER")
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Listen address syntax
    /// - Non-empty binding, pub/sub and topic names
    /// - Target format resolution
    /// - Backend-specific publisher settings
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.binding.validate()?;
        self.target.validate()?;
        self.publisher.validate()?;
        Ok(())
    }

    /// Resolved target format
    pub fn target_format(&self) -> Result<TargetFormat, ValidationError> {
        self.target.format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Destination;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = AppConfig::from_vars(Vec::new()).unwrap();

        assert_eq!(config.server.address, ":60010");
        assert_eq!(config.binding.source_name(), "fanout-queue-source-event-binding");
        assert_eq!(
            config.target.destination(),
            Destination::new("fanout-queue-target-event-binding", "events")
        );
        assert_eq!(config.target_format().unwrap(), TargetFormat::Json);
        assert_eq!(config.publisher.backend, PublisherBackend::Dapr);
        assert_eq!(config.publisher.dapr_http_endpoint, "http://localhost:3500");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let config = AppConfig::from_vars(vars(&[
            ("CONVERTER__SERVER__ADDRESS", "127.0.0.1:7000"),
            ("CONVERTER__BINDING__SOURCE", "sensor-queue"),
            ("CONVERTER__TARGET__PUBSUB_NAME", "fanout"),
            ("CONVERTER__TARGET__TOPIC_NAME", "readings"),
            ("CONVERTER__TARGET__FORMAT", "CSV"),
        ]))
        .unwrap();

        assert_eq!(config.server.address, "127.0.0.1:7000");
        assert_eq!(config.binding.source_name(), "sensor-queue");
        assert_eq!(config.target.destination(), Destination::new("fanout", "readings"));
        assert_eq!(config.target_format().unwrap(), TargetFormat::Csv);
    }

    #[test]
    fn test_numeric_values_parse_from_strings() {
        let config = AppConfig::from_vars(vars(&[
            ("CONVERTER__SERVER__REQUEST_TIMEOUT_SECS", "10"),
            ("CONVERTER__PUBLISHER__TIMEOUT_SECS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.server.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.publisher.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_dapr_http_port_sets_endpoint() {
        let config = AppConfig::from_vars(vars(&[("DAPR_HTTP_PORT", "3601")])).unwrap();

        assert_eq!(config.publisher.dapr_http_endpoint, "http://localhost:3601");
    }

    #[test]
    fn test_explicit_endpoint_wins_over_dapr_http_port() {
        let config = AppConfig::from_vars(vars(&[
            ("DAPR_HTTP_PORT", "3601"),
            ("CONVERTER__PUBLISHER__DAPR_HTTP_ENDPOINT", "http://sidecar:3500"),
        ]))
        .unwrap();

        assert_eq!(config.publisher.dapr_http_endpoint, "http://sidecar:3500");
    }

    #[test]
    fn test_dapr_api_token_is_picked_up() {
        let config = AppConfig::from_vars(vars(&[("DAPR_API_TOKEN", "s3cr3t")])).unwrap();

        assert_eq!(config.publisher.dapr_api_token(), Some("s3cr3t"));
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }

    #[test]
    fn test_redis_backend() {
        let config = AppConfig::from_vars(vars(&[
            ("CONVERTER__PUBLISHER__BACKEND", "redis"),
            ("CONVERTER__PUBLISHER__REDIS_URL", "redis://localhost:6379"),
        ]))
        .unwrap();

        assert_eq!(config.publisher.backend, PublisherBackend::Redis);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_format_fails_validation() {
        let config =
            AppConfig::from_vars(vars(&[("CONVERTER__TARGET__FORMAT", "protobuf")])).unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::UnsupportedFormat("protobuf".to_string()))
        );
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = AppConfig::from_vars(vars(&[
            ("PATH", "/usr/bin"),
            ("TARGET", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.server.address, ":60010");
        assert_eq!(config.target_format().unwrap(), TargetFormat::Json);
    }

    #[test]
    fn test_unprefixed_address() {
        let config = AppConfig::from_vars(vars(&[("ADDRESS", " :7001 ")])).unwrap();

        assert_eq!(config.server.address, ":7001");
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:7001".parse().unwrap()
        );
    }

    #[test]
    fn test_unprefixed_source_binding() {
        let config = AppConfig::from_vars(vars(&[("SOURCE_BINDING", "sensor-queue\n")])).unwrap();

        assert_eq!(config.binding.source_name(), "sensor-queue");
    }

    #[test]
    fn test_unprefixed_target_pubsub_name() {
        let config = AppConfig::from_vars(vars(&[("TARGET_PUBSUB_NAME", " fanout ")])).unwrap();

        assert_eq!(config.target.destination(), Destination::new("fanout", "events"));
    }

    #[test]
    fn test_unprefixed_target_topic_name() {
        let config = AppConfig::from_vars(vars(&[("TARGET_TOPIC_NAME", "readings")])).unwrap();

        assert_eq!(
            config.target.destination(),
            Destination::new("fanout-queue-target-event-binding", "readings")
        );
    }

    #[test]
    fn test_unprefixed_target_topic_format() {
        let config = AppConfig::from_vars(vars(&[("TARGET_TOPIC_FORMAT", " CSV ")])).unwrap();

        assert_eq!(config.target_format().unwrap(), TargetFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_value_wins_over_unprefixed() {
        let config = AppConfig::from_vars(vars(&[
            ("TARGET_TOPIC_FORMAT", "csv"),
            ("CONVERTER__TARGET__FORMAT", "xml"),
            ("ADDRESS", ":7001"),
            ("CONVERTER__SERVER__ADDRESS", "127.0.0.1:7002"),
        ]))
        .unwrap();

        assert_eq!(config.target_format().unwrap(), TargetFormat::Xml);
        assert_eq!(config.server.address, "127.0.0.1:7002");
    }

    #[test]
    fn test_validation_failure_converts_to_config_error() {
        let config =
            AppConfig::from_vars(vars(&[("TARGET_TOPIC_FORMAT", "protobuf")])).unwrap();

        let err = ConfigError::from(config.validate().unwrap_err());

        assert!(matches!(
            err,
            ConfigError::ValidationFailed(ValidationError::UnsupportedFormat(_))
        ));
    }
}
