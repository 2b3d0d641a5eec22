//! Axum router configuration for the inbound binding.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{acknowledge_binding, health, receive_binding_event, BindingAppState};

/// Create the binding router.
///
/// # Routes
///
/// - `POST /{source_binding}` - Convert and republish one event
/// - `OPTIONS /{source_binding}` - Binding registration probe
/// - `GET /healthz` - Liveness
pub fn binding_routes(source_binding: &str) -> Router<BindingAppState> {
    Router::new()
        .route(
            &format!("/{}", source_binding),
            post(receive_binding_event).options(acknowledge_binding),
        )
        .route("/healthz", get(health))
}

/// Create the complete application with request tracing and a per-request
/// timeout.
///
/// A request that outlives `request_timeout` is answered with
/// `408 Request Timeout`; its in-flight publish is dropped with it.
///
/// # Example
///
/// ```ignore
/// let app = binding_app("fanout-queue-source-event-binding", state, Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn binding_app(source_binding: &str, state: BindingAppState, request_timeout: Duration) -> Router {
    binding_routes(source_binding)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
