//! Publisher adapters for tests and local wiring.
//!
//! - `InMemoryPublisher` - Captures publishes for assertions

mod in_memory;

pub use in_memory::{InMemoryPublisher, PublishedMessage};
