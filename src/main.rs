//! Queue Format Converter service entry point.
//!
//! Startup order: configuration, logging, outbound publisher, inbound
//! listener. Any startup failure exits with a non-zero status; per-event
//! failures are reported to the runtime and never stop the process.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use queue_format_converter::adapters::http::{binding_app, BindingAppState};
use queue_format_converter::adapters::{DaprPublisher, DaprPublisherConfig, RedisPublisher};
use queue_format_converter::application::ConvertEventHandler;
use queue_format_converter::config::{AppConfig, ConfigError, PublisherBackend, PublisherConfig};
use queue_format_converter::domain::PublishError;
use queue_format_converter::ports::EventPublisher;

/// Failures that stop the service before or while serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create publisher client: {0}")]
    Publisher(#[source] PublishError),

    #[error("failed to start the server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.server.log_level);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate().map_err(ConfigError::from)?;

    let format = config.target_format().map_err(ConfigError::from)?;
    let addr = config.server.socket_addr().map_err(ConfigError::from)?;

    let publisher = build_publisher(&config.publisher)
        .await
        .map_err(StartupError::Publisher)?;

    let handler = ConvertEventHandler::new(format, config.target.destination(), publisher);
    let source = config.binding.source_name();

    tracing::info!(
        address = %addr,
        binding = %source,
        destination = %handler.destination(),
        format = %format,
        "Starting converter"
    );

    let app = binding_app(
        source,
        BindingAppState::new(Arc::new(handler)),
        config.server.request_timeout(),
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Converter stopped");
    Ok(())
}

/// Acquire the outbound client. It lives as long as the handler holding it
/// and is released on shutdown.
async fn build_publisher(config: &PublisherConfig) -> Result<Arc<dyn EventPublisher>, PublishError> {
    match config.backend {
        PublisherBackend::Dapr => {
            let mut dapr = DaprPublisherConfig::new(config.dapr_http_endpoint.clone())
                .with_timeout(config.timeout());
            if let Some(token) = config.dapr_api_token() {
                dapr = dapr.with_api_token(token);
            }
            Ok(Arc::new(DaprPublisher::new(dapr)?))
        }
        PublisherBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            Ok(Arc::new(RedisPublisher::connect(url, config.timeout()).await?))
        }
    }
}

/// Completes on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
