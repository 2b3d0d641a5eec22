//! Inbound binding configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Inbound binding configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BindingConfig {
    /// Name of the input binding events are delivered on
    #[serde(default = "default_source")]
    pub source: String,
}

impl BindingConfig {
    /// Binding name with surrounding whitespace removed
    pub fn source_name(&self) -> &str {
        self.source.trim()
    }

    /// Validate binding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_name().is_empty() {
            return Err(ValidationError::MissingRequired("BINDING__SOURCE"));
        }
        Ok(())
    }
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

fn default_source() -> String {
    "fanout-queue-source-event-binding".to_string()
}
