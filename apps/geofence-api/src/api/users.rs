//! Users and sessions API routes

use axum::Router;
use domain_users::{
    MongoUserRepository, SessionService, UserDependents, UserService, handlers,
};
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

/// Users router; deleting a user also removes what `dependents` holds for them
pub fn router(state: &AppState, dependents: Arc<dyn UserDependents>) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    let service =
        UserService::new(repository, state.geocoder.clone()).with_dependents(dependents);

    handlers::router(service)
}

/// Login router issuing bearer tokens
pub fn sessions_router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    let service = SessionService::new(repository, state.auth.clone());

    handlers::sessions_router(service)
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).ensure_indexes().await?;
    Ok(())
}
