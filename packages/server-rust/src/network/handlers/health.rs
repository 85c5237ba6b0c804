//! Health, liveness, and readiness endpoint handlers.
//!
//! These routes sit outside the in-flight middleware so orchestrators can
//! still probe the server while it drains.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Returns detailed health information as JSON.
///
/// Always returns 200; the `state` field tells "up but draining" apart from
/// "ready".
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let health = state.shutdown.health_state();
    let pool = state.db.pool_stats();

    Json(json!({
        "state": health.as_str(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "in_flight": state.shutdown.in_flight_count(),
        "db": {
            "size": pool.size,
            "idle": pool.idle,
        },
    }))
}

/// Liveness probe -- always 200 while the process answers.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe -- 200 in the Ready state, 503 while starting, draining,
/// or stopped.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
