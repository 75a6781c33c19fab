use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub services: HealthServices,
}

#[derive(Debug, Serialize)]
pub struct HealthServices {
    pub database: &'static str,
}

/// Liveness plus a database ping. A failed ping degrades the whole check.
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "database health check failed");
            false
        }
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    let (status_code, status, message, database) = if db_ok {
        (StatusCode::OK, "ok", "Service is healthy", "up")
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "degraded",
            "Database is unreachable",
            "down",
        )
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            message,
            timestamp,
            version: env!("CARGO_PKG_VERSION"),
            services: HealthServices { database },
        }),
    )
}
