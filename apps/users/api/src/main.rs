use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

use users_api::config::Config;
use users_api::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let state = AppState::new(config);
    let app = users_api::build_app(&state).await?;

    info!(
        surface = %state.config.surface,
        timeout = ?state.config.server.shutdown_timeout,
        "Starting users API"
    );

    let server = state.config.server.clone();
    let users = state.users.clone();

    create_production_app(app, &server, async move {
        // Nothing is persisted; report what is about to be dropped
        match users.count_users().await {
            Ok(count) => info!(count, "Discarding in-memory user store"),
            Err(e) => tracing::error!("Could not inspect user store: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
