//! Pulse Analytics Telemetry Pipeline
//!
//! Ingestion gateway for behavioral events:
//! - Project-key tenant authentication
//! - Per-caller fixed-window rate limiting
//! - Embeddable browser tracker served at /tracker.js
//!
//! The metrics engine and overview cache (`pulse-metrics`) are a
//! library surface consumed in-process by the dashboard.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use pulse_api::middleware::rate_limit::RateLimitConfig;
use pulse_api::{router, AppState};
use pulse_core::limits::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};
use pulse_store::MemoryStore;
use pulse_telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Rate limit window in seconds
    #[serde(default = "default_rate_window_secs")]
    rate_window_secs: u64,
    /// Admitted requests per window per caller identity
    #[serde(default = "default_rate_max_requests")]
    rate_max_requests: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_rate_window_secs() -> u64 {
    RATE_LIMIT_WINDOW_SECS
}

fn default_rate_max_requests() -> u32 {
    RATE_LIMIT_MAX_REQUESTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rate_window_secs: default_rate_window_secs(),
            rate_max_requests: default_rate_max_requests(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Pulse telemetry pipeline v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // The bundled single-process store; a database-backed EventStore
    // drops in behind the same trait.
    let store = Arc::new(MemoryStore::new());

    // Create application state
    let state = AppState::with_rate_limit(
        store,
        RateLimitConfig {
            window: Duration::from_secs(config.rate_window_secs),
            max_requests: config.rate_max_requests,
        },
    );

    // Start rate limiter cleanup background task
    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("PULSE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
