//! Regions API routes

use axum::Router;
use domain_regions::{MongoRegionRepository, RegionService, handlers};
use domain_users::MongoUserRepository;
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

/// Region service whose owners are looked up in the users collection
pub fn service(state: &AppState) -> RegionService<MongoRegionRepository> {
    let owners = Arc::new(MongoUserRepository::new(&state.db));
    RegionService::new(MongoRegionRepository::new(&state.db), owners)
}

/// Regions router; writes are guarded by the bearer token middleware
pub fn router(state: &AppState, service: RegionService<MongoRegionRepository>) -> Router {
    handlers::router(service, state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoRegionRepository::new(db).ensure_indexes().await?;
    Ok(())
}
