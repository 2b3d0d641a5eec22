//! Dapr sidecar adapters.
//!
//! - `DaprPublisher` - Publishes over the sidecar's HTTP publish API

mod publisher;

pub use publisher::{DaprPublisher, DaprPublisherConfig};
