//! Redis adapters.
//!
//! - `RedisPublisher` - Publishes with `PUBLISH` on `{pubsub}:{topic}`

mod publisher;

pub use publisher::{channel_for, RedisPublisher};
