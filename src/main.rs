//! Agent Health API entry point.
//!
//! Initializes tracing, loads configuration from TOML plus environment
//! overrides, constructs the application state (process start time, metrics
//! source, readiness check, rate limiter), builds the Axum router, and runs
//! the HTTP server until a shutdown signal arrives.

use std::fs::OpenOptions;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use agent_health::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use agent_health::server::start_server;
use agent_health::routes::create_router;
use agent_health::state::AppState;

/// Agent Health API: health and status endpoints for one service instance
#[derive(Parser, Debug)]
#[command(name = "agent-health", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "agent_health=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (file first, then env overrides)
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config)?;

    tracing::info!(
        environment = %config.service.environment,
        version = %config.service.version,
        "Loaded configuration"
    );
    tracing::info!(
        database = config.dependencies.database,
        external_api = config.dependencies.external_api,
        cache = config.dependencies.cache,
        "Dependency checks configured"
    );

    // Create application state: start time, metrics source, readiness,
    // rate limiter - built here once and threaded into the router
    let state = AppState::new(config.clone());

    // Create router
    let app = create_router(state);

    // Start server; blocks until SIGINT/SIGTERM
    start_server(app, &config).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Set up the tracing subscriber: env-filtered, text or JSON per config,
/// with an optional append-only log file alongside stdout.
fn init_tracing(filter: &str, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout_layer = if config.logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
