use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use placements_core::{CoreConfig, PlacementService, config::max_upload_bytes_from_env_value};

/// Main entry point for the placement locator
///
/// Starts the REST server on port 3000 (configurable via PLACEMENTS_REST_ADDR) with an empty
/// placement index. Clients populate the index by uploading a definition file; nothing is
/// persisted across restarts.
///
/// # Environment Variables
/// - `PLACEMENTS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PLACEMENTS_MAX_UPLOAD_BYTES`: Upload body limit in bytes (default: 10 MiB)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("placements_run=info".parse()?)
                .add_directive("placements_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("PLACEMENTS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let max_upload_bytes =
        max_upload_bytes_from_env_value(std::env::var("PLACEMENTS_MAX_UPLOAD_BYTES").ok())?;
    let cfg = Arc::new(CoreConfig::new(max_upload_bytes)?);

    tracing::info!("++ Starting placements REST on {}", rest_addr);
    tracing::info!("++ Upload limit {} bytes", cfg.max_upload_bytes());

    let app = api_rest::router(AppState::new(cfg, PlacementService::new()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Placements REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
