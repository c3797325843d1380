//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the placement locator REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `placements-run` binary starts the
//! same router with the same configuration.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use placements_core::{config::max_upload_bytes_from_env_value, CoreConfig, PlacementService};

/// Main entry point for the REST API server
///
/// # Environment Variables
/// - `PLACEMENTS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PLACEMENTS_MAX_UPLOAD_BYTES`: Upload body limit in bytes (default: 10 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the upload size limit is not a positive integer,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("placements_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PLACEMENTS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let max_upload_bytes =
        max_upload_bytes_from_env_value(std::env::var("PLACEMENTS_MAX_UPLOAD_BYTES").ok())?;
    let cfg = Arc::new(CoreConfig::new(max_upload_bytes)?);

    tracing::info!("-- Starting placements REST API on {}", addr);

    let app = api_rest::router(AppState::new(cfg, PlacementService::new()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
