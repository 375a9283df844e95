//! API routes module
//!
//! Wires the users, sessions and regions domains to MongoDB-backed services.

pub mod health;
pub mod regions;
pub mod users;

use axum::Router;
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let regions = regions::service(state);

    Router::new()
        .nest("/users", users::router(state, Arc::new(regions.clone())))
        .nest("/sessions", users::sessions_router(state))
        .nest("/regions", regions::router(state, regions))
        .merge(health::router(state.clone()))
}

/// Create the indexes every collection relies on
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    users::init_indexes(db).await?;
    regions::init_indexes(db).await?;
    Ok(())
}
