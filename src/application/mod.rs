//! Application layer - per-event orchestration.
//!
//! This layer wires the domain's decoder and encoders to the outbound
//! publisher port.

pub mod handlers;

pub use handlers::ConvertEventHandler;
