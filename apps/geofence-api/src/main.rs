use axum_helpers::{JwtAuth, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_geo::NominatimGeocoder;
use std::sync::Arc;
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

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    let mongo_client = database::mongodb::connect_from_config_with_retry(
        &config.mongodb,
        Some(config.mongodb_retry.clone()),
    )
    .await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    api::init_indexes(&db).await?;

    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let auth = JwtAuth::new(&config.jwt);

    let state = AppState {
        config,
        mongo_client,
        db,
        geocoder: Arc::new(geocoder),
        auth,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app.clone()));

    let server = state.config.server.clone();
    let mongo_client = state.mongo_client.clone();
    info!(
        "Starting Geofence API with graceful shutdown ({:?} timeout)",
        server.shutdown_timeout()
    );

    create_production_app(app, &server, server.shutdown_timeout(), async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Geofence API shutdown complete");
    Ok(())
}
