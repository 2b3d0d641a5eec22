//! Response DTOs for the binding endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ConversionError;

/// Error body returned to the runtime when a dispatch fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message naming the failed stage.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ConversionError> for ErrorResponse {
    fn from(err: &ConversionError) -> Self {
        Self::new(err.code().to_string(), err.to_string())
    }
}
