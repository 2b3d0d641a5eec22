//! Error types for the conversion pipeline.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error codes, one per failed pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DecodeFailed,
    UnsupportedFormat,
    EncodeFailed,
    PublishFailed,
    PublishTimeout,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::DecodeFailed => "DECODE_FAILED",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorCode::EncodeFailed => "ENCODE_FAILED",
            ErrorCode::PublishFailed => "PUBLISH_FAILED",
            ErrorCode::PublishTimeout => "PUBLISH_TIMEOUT",
        };
        write!(f, "{}", s)
    }
}

/// Failures reported by an outbound publisher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    /// The broker or sidecar answered, but refused the message.
    #[error("publish to {destination} rejected with status {status}: {body}")]
    Rejected {
        destination: String,
        status: u16,
        body: String,
    },

    #[error("transport failure: {0}")]
    Transport(String),

    /// The call was abandoned before the publisher answered.
    #[error("publish timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("backend error: {0}")]
    Backend(String),
}

impl PublishError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        PublishError::Transport(message.into())
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        PublishError::Backend(message.into())
    }

    /// Returns true for the cancellation-kind failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PublishError::Timeout { .. })
    }
}

/// Terminal failure of a single dispatch.
///
/// Every variant names the stage that failed; none of them is retried
/// locally. The transport that invoked the handler decides what happens
/// to the event.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("error parsing input content: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid target format: {0}")]
    UnsupportedFormat(String),

    #[error("error while converting content: {0}")]
    Encode(String),

    #[error("error publishing converted content: {0}")]
    Publish(#[from] PublishError),
}

impl ConversionError {
    /// Creates an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        ConversionError::Encode(message.into())
    }

    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConversionError::Decode(_) => ErrorCode::DecodeFailed,
            ConversionError::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            ConversionError::Encode(_) => ErrorCode::EncodeFailed,
            ConversionError::Publish(e) if e.is_timeout() => ErrorCode::PublishTimeout,
            ConversionError::Publish(_) => ErrorCode::PublishFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_code_displays_screaming_snake_case() {
        assert_eq!(ErrorCode::DecodeFailed.to_string(), "DECODE_FAILED");
        assert_eq!(ErrorCode::PublishTimeout.to_string(), "PUBLISH_TIMEOUT");
    }

    #[test]
    fn decode_error_keeps_parse_detail() {
        let parse_err = serde_json::from_slice::<serde_json::Value>(b"{\"id\":").unwrap_err();
        let err = ConversionError::Decode(parse_err);

        assert_eq!(err.code(), ErrorCode::DecodeFailed);
        assert!(err.to_string().starts_with("error parsing input content: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn unsupported_format_names_the_value() {
        let err = ConversionError::UnsupportedFormat("yaml".to_string());
        assert_eq!(err.to_string(), "invalid target format: yaml");
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
    }

    #[test]
    fn publish_error_wraps_underlying_cause() {
        let err: ConversionError = PublishError::transport("connection refused").into();
        assert_eq!(
            err.to_string(),
            "error publishing converted content: transport failure: connection refused"
        );
        assert_eq!(err.code(), ErrorCode::PublishFailed);
    }

    #[test]
    fn publish_timeout_has_its_own_code() {
        let err = ConversionError::Publish(PublishError::Timeout {
            timeout: Duration::from_secs(5),
        });
        assert_eq!(err.code(), ErrorCode::PublishTimeout);
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let err = PublishError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "publish timed out after 250ms");

        let err = PublishError::Timeout {
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "publish timed out after 5s");
    }

    #[test]
    fn rejected_publish_displays_status_and_body() {
        let err = PublishError::Rejected {
            destination: "pubsub/events".to_string(),
            status: 500,
            body: "broker down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "publish to pubsub/events rejected with status 500: broker down"
        );
        assert!(!err.is_timeout());
    }
}
