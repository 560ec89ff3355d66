use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /health
/// Reports the service version and whether Postgres answers a trivial query.
/// Always 200 so the process stays up when only the database is down.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "up",
        Err(e) => {
            warn!("Health check could not reach the database: {e}");
            "unreachable"
        }
    };

    Json(HealthReport {
        status: if database == "up" { "ok" } else { "degraded" },
        service: "member-portal-api",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
