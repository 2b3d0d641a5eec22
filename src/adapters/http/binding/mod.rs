//! Inbound binding HTTP adapter.
//!
//! Exposes the source binding as an HTTP route the Dapr runtime delivers
//! events to, and maps dispatch failures to status codes.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{status_for, BindingAppState};
pub use routes::{binding_app, binding_routes};
