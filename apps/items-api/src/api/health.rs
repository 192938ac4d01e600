//! Store health endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    database: DatabaseStatus,
    timestamp: DateTime<Utc>,
}

/// Create a health check router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Store connectivity probe.
///
/// Always answers 200: the probe result is data, not an error. A dead
/// database shows up as `"database": "Disconnected"`.
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = match database::postgres::check_health(&state.db).await {
        Ok(_) => DatabaseStatus::Connected,
        Err(e) => {
            tracing::warn!("Health check: database unreachable: {}", e);
            DatabaseStatus::Disconnected
        }
    };

    Json(HealthStatus {
        status: "OK",
        database,
        timestamp: Utc::now(),
    })
}
