//! Readiness check backed by a MongoDB ping

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// Create the readiness router (`/ready`, nested under `/api`)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            if database::mongodb::check_health(&state.mongo_client).await {
                Ok(())
            } else {
                Err("MongoDB ping failed".to_string())
            }
        }),
    )];

    run_health_checks(checks).await
}
