//! EventPublisher port - Interface for publishing converted payloads.
//!
//! This port defines how the pipeline hands encoded bytes to a pub/sub
//! topic without knowing about the underlying transport (Dapr sidecar,
//! Redis, in-memory).

use std::fmt;

use async_trait::async_trait;

use crate::domain::PublishError;

/// Where converted events are published: a pub/sub component and a topic
/// within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub pubsub_name: String,
    pub topic_name: String,
}

impl Destination {
    pub fn new(pubsub_name: impl Into<String>, topic_name: impl Into<String>) -> Self {
        Self {
            pubsub_name: pubsub_name.into(),
            topic_name: topic_name.into(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pubsub_name, self.topic_name)
    }
}

/// Port for publishing encoded payloads.
///
/// Implementations must:
/// - Make exactly one delivery attempt per call (no internal retry)
/// - Propagate failures to the caller
/// - Stop promptly when the returned future is dropped
///
/// # Example
///
/// ```ignore
/// let destination = Destination::new("fanout-queue-target-event-binding", "events");
/// publisher.publish(&destination, payload, "application/json").await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one payload to `destination`.
    async fn publish(
        &self,
        destination: &Destination,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError>;

    /// Publisher name for logging.
    fn name(&self) -> &'static str;
}
