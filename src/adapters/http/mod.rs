//! HTTP adapters - inbound channel implementations.
//!
//! - `binding` - Dapr input binding delivered over the HTTP app channel

pub mod binding;

// Re-export key types for convenience
pub use binding::{binding_app, binding_routes, BindingAppState};
