use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let dotenv_path = core_config::load_dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = database::mongodb::resolve_database(&mongo_client, &config.mongodb);
    info!("Using MongoDB database: {}", db.name());

    domain_events::mongodb::create_indexes(&db)
        .await
        .map_err(|e| eyre::eyre!("Failed to create indexes: {}", e))?;

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(state.config.app));

    info!(
        "Starting {} v{} (30s shutdown timeout)",
        state.config.app.name, state.config.app.version
    );

    let server = state.config.server.clone();
    let mongo_client = state.mongo_client.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}
