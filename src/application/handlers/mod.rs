//! Application handlers.
//!
//! - `ConvertEventHandler` - decode, re-encode and publish one inbound event

mod convert_event;

pub use convert_event::ConvertEventHandler;
