//! HTTP handlers for the roster server.
//!
//! Each API handler opens one [`Session`](crate::storage::Session), calls a
//! domain operation, commits after a successful write, and maps the outcome
//! to a status and JSON body. A handler that returns early drops its session,
//! which rolls the transaction back.

pub mod courses;
pub mod extract;
pub mod groups;
pub mod health;
pub mod metrics;
pub mod students;

pub use courses::{
    create_course_handler, delete_course_handler, get_course_handler, list_courses_handler,
    students_by_course_handler, update_course_handler,
};
pub use extract::{JsonBody, PatchBody, PathParam, QueryParams};
pub use groups::{
    create_group_handler, group_students_handler, groups_with_max_students_handler,
    list_groups_handler,
};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use metrics::metrics_handler;
pub use students::{
    create_student_handler, delete_student_handler, enroll_handler, get_student_handler,
    list_students_handler, unenroll_handler, update_student_handler,
};

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;

use super::{NetworkConfig, ShutdownController};
use crate::storage::Database;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Relational store; handlers open one session per request.
    pub db: Database,
    /// Health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    pub config: Arc<NetworkConfig>,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, config: NetworkConfig) -> Self {
        Self {
            db,
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(config),
            metrics: None,
            start_time: Instant::now(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::AppState;
    use crate::network::{build_router, NetworkConfig};
    use crate::storage::{Database, StorageConfig};

    pub async fn test_app() -> Router {
        let db = Database::in_memory().await.unwrap();
        build_router(AppState::new(db, NetworkConfig::default()))
    }

    /// Router over a file-backed database with a multi-connection pool, so
    /// concurrent requests really run in parallel. Keep the `TempDir` alive
    /// for the duration of the test.
    pub async fn file_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_url: format!("sqlite://{}", dir.path().join("roster.db").display()),
            ..StorageConfig::default()
        };
        let db = Database::connect(&config).await.unwrap();
        db.initialize().await.unwrap();
        (dir, build_router(AppState::new(db, NetworkConfig::default())))
    }

    /// Sends one request and returns the status and the JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
