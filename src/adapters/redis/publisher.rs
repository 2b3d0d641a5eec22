//! Redis-backed publisher for deployments without a Dapr sidecar.
//!
//! Payloads are sent with `PUBLISH` on the channel `{pubsub}:{topic}`.
//! Redis pub/sub is fire-and-forget: a message published while no
//! subscriber is listening is dropped by the server, and that is still
//! reported as success.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::PublishError;
use crate::ports::{Destination, EventPublisher};

/// Publishes through Redis `PUBLISH`.
#[derive(Clone)]
pub struct RedisPublisher {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisPublisher {
    /// Create a publisher over an established connection.
    pub fn new(conn: MultiplexedConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Open a multiplexed connection to `url` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Backend` if the URL is invalid or the server
    /// cannot be reached within `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, PublishError> {
        let client = redis::Client::open(url)
            .map_err(|e: redis::RedisError| PublishError::backend(e.to_string()))?;

        let conn = tokio::time::timeout(timeout, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| PublishError::Timeout { timeout })?
            .map_err(|e: redis::RedisError| PublishError::backend(e.to_string()))?;

        Ok(Self::new(conn, timeout))
    }
}

/// Channel name for a destination.
pub fn channel_for(destination: &Destination) -> String {
    format!("{}:{}", destination.pubsub_name, destination.topic_name)
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(
        &self,
        destination: &Destination,
        payload: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), PublishError> {
        let channel = channel_for(destination);
        let mut conn = self.conn.clone();

        let receivers: i64 = tokio::time::timeout(self.timeout, conn.publish(&channel, payload))
            .await
            .map_err(|_| PublishError::Timeout {
                timeout: self.timeout,
            })?
            .map_err(|e: redis::RedisError| {
                if e.is_io_error() || e.is_connection_dropped() {
                    PublishError::transport(e.to_string())
                } else {
                    PublishError::backend(e.to_string())
                }
            })?;

        tracing::debug!(channel = %channel, receivers, "Published event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RedisPublisher"
    }
}
