//! Health probes
//!
//! Three endpoints for orchestration: `/health/ping` answers as long as the
//! process accepts connections, `/health/live` is the liveness probe, and
//! `/health/ready` round-trips the database before reporting ready.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::db::DbClient;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of the database round-trip performed by the readiness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of the liveness and readiness probes. Liveness reports the bare
/// status; readiness fills in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
}

impl HealthReport {
    fn alive() -> Self {
        Self {
            status: HealthStatus::Healthy,
            database: None,
            version: None,
            uptime_seconds: None,
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub db: DbClient,
    pub started: Instant,
}

impl HealthState {
    pub fn new(db: DbClient) -> Self {
        Self {
            db,
            started: Instant::now(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - liveness probe, no dependency checks
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthReport),
    ),
)]
pub async fn live() -> impl IntoResponse {
    Json(HealthReport::alive())
}

/// GET /health/ready - readiness probe backed by a database round-trip
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport),
    ),
)]
pub async fn ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let probe_start = Instant::now();
    let outcome = state.db.ping().await;

    let (status_code, status, database) = match outcome {
        Ok(()) => (
            StatusCode::OK,
            HealthStatus::Healthy,
            DatabaseHealth {
                status: HealthStatus::Healthy,
                latency_ms: Some(probe_start.elapsed().as_millis() as u64),
                error: None,
            },
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthStatus::Unhealthy,
            DatabaseHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some(err.message),
            },
        ),
    };

    let report = HealthReport {
        status,
        database: Some(database),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        uptime_seconds: Some(state.started.elapsed().as_secs()),
    };

    (status_code, Json(report))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

pub fn create_router(db: DbClient) -> Router {
    let state = Arc::new(HealthState::new(db));

    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(live))
        .route("/ready", get(ready))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_report_is_bare() {
        let json = serde_json::to_value(HealthReport::alive()).unwrap();
        assert_eq!(json.get("status").unwrap(), "healthy");
        assert!(json.get("database").is_none());
        assert!(json.get("uptime_seconds").is_none());
    }

    #[test]
    fn test_failed_probe_carries_error() {
        let db = DatabaseHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            error: Some("Database operation failed".to_string()),
        };
        let json = serde_json::to_value(&db).unwrap();
        assert_eq!(json.get("status").unwrap(), "unhealthy");
        assert!(json.get("error").is_some());
        assert!(json.get("latency_ms").is_none());
    }
}
