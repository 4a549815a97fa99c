use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`. Always 200; a dead database shows as `degraded`.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub db_healthy: bool,
    pub version: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let db_healthy = match rocketlab_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(Health {
        status: if db_healthy { "ok" } else { "degraded" },
        db_healthy,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
