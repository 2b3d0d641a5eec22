//! HTTP handlers for the inbound binding.
//!
//! The runtime delivers each binding event as `POST /{binding}` with the raw
//! payload as body, and treats any non-2xx answer as a failed delivery.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::ConvertEventHandler;
use crate::domain::{ConversionError, ErrorCode};

use super::dto::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the binding routes.
#[derive(Clone)]
pub struct BindingAppState {
    pub handler: Arc<ConvertEventHandler>,
}

impl BindingAppState {
    pub fn new(handler: Arc<ConvertEventHandler>) -> Self {
        Self { handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /{binding} - convert and republish one event.
pub async fn receive_binding_event(
    State(state): State<BindingAppState>,
    body: Bytes,
) -> Response {
    match state.handler.handle(&body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::warn!(error_code = %err.code(), "{}", err);
            (status_for(&err), Json(ErrorResponse::from(&err))).into_response()
        }
    }
}

/// OPTIONS /{binding} - the runtime probes this before delivering events.
pub async fn acknowledge_binding() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Maps a dispatch failure to the status reported to the runtime.
pub fn status_for(err: &ConversionError) -> StatusCode {
    match err.code() {
        ErrorCode::DecodeFailed => StatusCode::BAD_REQUEST,
        ErrorCode::UnsupportedFormat | ErrorCode::EncodeFailed => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::PublishFailed => StatusCode::BAD_GATEWAY,
        ErrorCode::PublishTimeout => StatusCode::GATEWAY_TIMEOUT,
    }
}
