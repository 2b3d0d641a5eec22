//! Dapr Publisher - Implementation of EventPublisher over the sidecar's HTTP API.
//!
//! Each payload is posted unchanged to
//! `{endpoint}/v1.0/publish/{pubsub}/{topic}` with the format's content type.
//!
//! # Configuration
//!
//! ```ignore
//! let config = DaprPublisherConfig::new("http://localhost:3500")
//!     .with_api_token(token)
//!     .with_timeout(Duration::from_secs(5));
//!
//! let publisher = DaprPublisher::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::domain::PublishError;
use crate::ports::{Destination, EventPublisher};

/// Header the sidecar checks when API token authentication is enabled.
const API_TOKEN_HEADER: &str = "dapr-api-token";

/// Configuration for the Dapr publisher.
#[derive(Debug, Clone)]
pub struct DaprPublisherConfig {
    /// Sidecar HTTP endpoint (default: http://localhost:3500).
    pub endpoint: String,
    /// Optional sidecar API token.
    api_token: Option<Secret<String>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DaprPublisherConfig {
    /// Creates a configuration for the sidecar at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the sidecar API token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Secret::new(token.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API token (for making requests).
    fn api_token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

/// Publishes through the Dapr sidecar.
///
/// The HTTP client is created once and reused for every publish; it is
/// released when the publisher is dropped.
pub struct DaprPublisher {
    config: DaprPublisherConfig,
    client: Client,
}

impl DaprPublisher {
    /// Creates a new Dapr publisher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Transport` if the HTTP client cannot be built.
    pub fn new(config: DaprPublisherConfig) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PublishError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the publish endpoint URL for a destination.
    fn publish_url(&self, destination: &Destination) -> String {
        format!(
            "{}/v1.0/publish/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            destination.pubsub_name,
            destination.topic_name
        )
    }
}

#[async_trait]
impl EventPublisher for DaprPublisher {
    async fn publish(
        &self,
        destination: &Destination,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError> {
        let mut request = self
            .client
            .post(self.publish_url(destination))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload);

        if let Some(token) = self.config.api_token() {
            request = request.header(API_TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PublishError::Timeout {
                    timeout: self.config.timeout,
                }
            } else if e.is_connect() {
                PublishError::transport(format!("Connection failed: {}", e))
            } else {
                PublishError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(destination = %destination, status = status.as_u16(), "Published event");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PublishError::Rejected {
            destination: destination.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "DaprPublisher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct CapturedRequest {
        pubsub: String,
        topic: String,
        content_type: Option<String>,
        token: Option<String>,
        body: Vec<u8>,
    }

    #[derive(Clone)]
    struct SidecarState {
        captured: Arc<Mutex<Vec<CapturedRequest>>>,
        status: StatusCode,
    }

    async fn fake_publish(
        State(state): State<SidecarState>,
        Path((pubsub, topic)): Path<(String, String)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        state.captured.lock().unwrap().push(CapturedRequest {
            pubsub,
            topic,
            content_type: header("content-type"),
            token: header(API_TOKEN_HEADER),
            body: body.to_vec(),
        });
        let body = if state.status.is_success() { "" } else { "pubsub unavailable" };
        (state.status, body)
    }

    /// Starts a fake sidecar and returns its base URL.
    async fn start_sidecar(status: StatusCode) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = SidecarState {
            captured: captured.clone(),
            status,
        };
        let app = Router::new()
            .route("/v1.0/publish/:pubsub/:topic", post(fake_publish))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    #[test]
    fn publish_url_joins_endpoint_and_destination() {
        let publisher = DaprPublisher::new(DaprPublisherConfig::new("http://localhost:3500/")).unwrap();

        let url = publisher.publish_url(&Destination::new("fanout", "events"));

        assert_eq!(url, "http://localhost:3500/v1.0/publish/fanout/events");
    }

    #[test]
    fn config_does_not_leak_token_in_debug() {
        let config = DaprPublisherConfig::new("http://localhost:3500").with_api_token("s3cr3t");
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }

    #[tokio::test]
    async fn posts_payload_with_content_type_and_token() {
        let (endpoint, captured) = start_sidecar(StatusCode::NO_CONTENT).await;
        let publisher =
            DaprPublisher::new(DaprPublisherConfig::new(endpoint).with_api_token("s3cr3t")).unwrap();

        publisher
            .publish(&Destination::new("fanout", "events"), b"<x/>".to_vec(), "application/xml")
            .await
            .unwrap();

        let requests = captured.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].pubsub, "fanout");
        assert_eq!(requests[0].topic, "events");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/xml"));
        assert_eq!(requests[0].token.as_deref(), Some("s3cr3t"));
        assert_eq!(requests[0].body, b"<x/>".to_vec());
    }

    #[tokio::test]
    async fn omits_token_header_when_not_configured() {
        let (endpoint, captured) = start_sidecar(StatusCode::NO_CONTENT).await;
        let publisher = DaprPublisher::new(DaprPublisherConfig::new(endpoint)).unwrap();

        publisher
            .publish(&Destination::new("fanout", "events"), b"{}".to_vec(), "application/json")
            .await
            .unwrap();

        assert_eq!(captured.lock().unwrap()[0].token, None);
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_once() {
        let (endpoint, captured) = start_sidecar(StatusCode::INTERNAL_SERVER_ERROR).await;
        let publisher = DaprPublisher::new(DaprPublisherConfig::new(endpoint)).unwrap();

        let err = publisher
            .publish(&Destination::new("fanout", "events"), b"{}".to_vec(), "application/json")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PublishError::Rejected {
                destination: "fanout/events".to_string(),
                status: 500,
                body: "pubsub unavailable".to_string(),
            }
        );
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_sidecar_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let publisher =
            DaprPublisher::new(DaprPublisherConfig::new(format!("http://{}", addr))).unwrap();

        let err = publisher
            .publish(&Destination::new("fanout", "events"), b"{}".to_vec(), "application/json")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Transport(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn slow_sidecar_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections but never answer.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let publisher = DaprPublisher::new(
            DaprPublisherConfig::new(format!("http://{}", addr))
                .with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let err = publisher
            .publish(&Destination::new("fanout", "events"), b"{}".to_vec(), "application/json")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PublishError::Timeout {
                timeout: Duration::from_millis(100)
            }
        );
        assert_eq!(err.to_string(), "publish timed out after 100ms");
    }
}
