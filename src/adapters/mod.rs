//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the conversion pipeline to external systems:
//! - `events` - In-memory publisher for tests
//! - `dapr` - Dapr sidecar publisher
//! - `redis` - Redis `PUBLISH` publisher
//! - `http` - Inbound binding endpoint

pub mod dapr;
pub mod events;
pub mod http;
pub mod redis;

pub use dapr::{DaprPublisher, DaprPublisherConfig};
pub use events::{InMemoryPublisher, PublishedMessage};
pub use self::redis::RedisPublisher;
