use tokio::net::TcpListener;
use tracing::info;

use reasoning_lab::{config::Config, create_router, utils::init_logger, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();
    let logging = reasoning_lab::config::LoggingConfig::from_env();
    let _log_guard = init_logger(&logging);

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    // Create shared state
    let state = AppState::from_config(config.clone())?;

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
