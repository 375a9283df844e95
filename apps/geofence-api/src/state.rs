//! Application state management.

use axum_helpers::JwtAuth;
use domain_geo::Geocoder;
use mongodb::{Client, Database};
use std::sync::Arc;

/// Shared application state.
///
/// Cloned into route builders; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    /// Forward and reverse geocoding for user locations
    pub geocoder: Arc<dyn Geocoder>,
    /// Bearer token issuer and verifier
    pub auth: JwtAuth,
}
