//! ConvertEventHandler - dispatches one inbound event through the pipeline.
//!
//! Each call walks Start → Decoded → Encoded → Published. The first failing
//! stage ends the call with a single error; nothing is retried, requeued or
//! stored, and no publish is attempted unless both decode and encode
//! succeeded.

use std::sync::Arc;

use crate::domain::{decode, ConversionError, TargetFormat};
use crate::ports::{Destination, EventPublisher};

/// Handler for inbound binding events.
///
/// Holds only read-only configuration and the publisher, so a single
/// instance is shared across concurrently delivered events.
pub struct ConvertEventHandler {
    format: TargetFormat,
    destination: Destination,
    publisher: Arc<dyn EventPublisher>,
}

impl ConvertEventHandler {
    pub fn new(
        format: TargetFormat,
        destination: Destination,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            format,
            destination,
            publisher,
        }
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Converts `raw` and publishes the result.
    ///
    /// Dropping the returned future abandons an in-flight publish.
    pub async fn handle(&self, raw: &[u8]) -> Result<(), ConversionError> {
        // 1. Decode
        let event = decode(raw)?;

        // 2. Encode
        let payload = self.format.encode(raw, &event)?;

        // 3. Publish
        self.publisher
            .publish(&self.destination, payload, self.format.content_type())
            .await?;

        tracing::debug!(
            id = %event.id,
            format = %self.format,
            destination = %self.destination,
            publisher = self.publisher.name(),
            "Event converted"
        );

        Ok(())
    }
}
