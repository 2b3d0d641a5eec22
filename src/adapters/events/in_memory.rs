//! In-memory publisher implementation for testing.
//!
//! Captures every publish call so tests can assert on what would have been
//! sent to the broker.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::PublishError;
use crate::ports::{Destination, EventPublisher};

/// One captured publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub destination: Destination,
    pub payload: Vec<u8>,
    pub content_type: String,
}

/// In-memory publisher for testing.
///
/// Features:
/// - Message capture for assertions
/// - Attempt counting, including failed attempts
/// - Configurable failure for error-path tests
///
/// # Example
///
/// ```ignore
/// let publisher = Arc::new(InMemoryPublisher::new());
/// handler.handle(raw).await?;
///
/// assert_eq!(publisher.message_count(), 1);
/// ```
pub struct InMemoryPublisher {
    published: RwLock<Vec<PublishedMessage>>,
    attempts: AtomicUsize,
    failure: Option<PublishError>,
}

impl InMemoryPublisher {
    /// Creates a publisher that accepts every message.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            failure: None,
        }
    }

    /// Creates a publisher that rejects every message with `error`.
    pub fn failing(error: PublishError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    // === Test Helpers ===

    /// Returns all accepted messages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn published_messages(&self) -> Vec<PublishedMessage> {
        self.published
            .read()
            .expect("InMemoryPublisher: published lock poisoned")
            .clone()
    }

    /// Returns count of accepted messages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn message_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryPublisher: published lock poisoned")
            .len()
    }

    /// Returns how many times `publish` was called, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Clears captured messages and the attempt counter.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryPublisher: published write lock poisoned")
            .clear();
        self.attempts.store(0, Ordering::SeqCst);
    }
}

impl Default for InMemoryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(
        &self,
        destination: &Destination,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        self.published
            .write()
            .expect("InMemoryPublisher: published write lock poisoned")
            .push(PublishedMessage {
                destination: destination.clone(),
                payload,
                content_type: content_type.to_string(),
            });

        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryPublisher"
    }
}
