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

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Error reporting before anything that can fail
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // A failed connection here aborts startup; the retry only covers
    // transient errors while the database comes up
    info!("Connecting to MongoDB at {}", config.mongodb.url());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = config.mongodb.database(), "MongoDB ready");

    api::events::init_indexes(&db).await?;

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    // Domain routes land under /api; docs UIs and the liveness endpoint
    // stay at the root
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting calendar API");
    create_production_app(app, &state.config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Releasing MongoDB connections");
        drop(state.mongo_client);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}
