//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversion pipeline and the messaging runtime. Adapters implement
//! these ports.
//!
//! - `EventPublisher` - Port for handing encoded payloads to a pub/sub topic

mod event_publisher;

pub use event_publisher::{Destination, EventPublisher};
