//! Router assembly and the network module's deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown signal fires. The
//! binary can hand the shutdown controller to its signal handler between
//! `start()` and `serve()`.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    create_course_handler, create_group_handler, create_student_handler, delete_course_handler,
    delete_student_handler, enroll_handler, get_course_handler, get_student_handler,
    group_students_handler, groups_with_max_students_handler, health_handler,
    list_courses_handler, list_groups_handler, list_students_handler, liveness_handler,
    metrics_handler, readiness_handler, students_by_course_handler, unenroll_handler,
    update_course_handler, update_student_handler, AppState,
};
use super::middleware::{build_http_layers, record_metrics, track_in_flight};
use super::shutdown::ShutdownController;
use crate::storage::Database;

/// Assembles the full router for `state`.
///
/// API routes carry the in-flight and metrics middleware; `/health*` and
/// `/metrics` do not, so probes keep answering while the server drains.
/// `/metrics` is only mounted when a Prometheus handle is present.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/groups", get(list_groups_handler).post(create_group_handler))
        .route(
            "/groups/with_max_students",
            get(groups_with_max_students_handler),
        )
        .route("/groups/{group_id}/students", get(group_students_handler))
        .route(
            "/students",
            get(list_students_handler).post(create_student_handler),
        )
        .route(
            "/students/{student_id}",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .route(
            "/students/{student_id}/courses/{course_id}",
            post(enroll_handler).delete(unenroll_handler),
        )
        .route(
            "/courses",
            get(list_courses_handler).post(create_course_handler),
        )
        .route(
            "/courses/{course_id}",
            get(get_course_handler)
                .put(update_course_handler)
                .delete(delete_course_handler),
        )
        .route(
            "/students_by_course/{course_name}",
            get(students_by_course_handler),
        )
        .route_layer(from_fn_with_state(
            Arc::clone(&state.shutdown),
            track_in_flight,
        ))
        .route_layer(from_fn(record_metrics));

    let mut router = Router::new()
        .merge(api)
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler));
    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics_handler));
    }

    router
        .layer(build_http_layers(&state.config))
        .with_state(state)
}

/// Owns the HTTP server lifecycle.
///
/// The database and shutdown controller are allocated before binding so the
/// caller can share them (seeding, signal handling) ahead of `serve()`.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    db: Database,
    shutdown: Arc<ShutdownController>,
    metrics: Option<PrometheusHandle>,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, db: Database) -> Self {
        Self {
            config,
            listener: None,
            db,
            shutdown: Arc::new(ShutdownController::new()),
            metrics: None,
        }
    }

    /// Mounts `GET /metrics` backed by `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Builds the router over this module's shared state.
    pub fn build_router(&self) -> Router {
        build_router(AppState {
            db: self.db.clone(),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            metrics: self.metrics.clone(),
            start_time: Instant::now(),
        })
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound port, which differs from the configured one when
    /// port 0 (OS-assigned) is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// After the signal the health state moves to Draining (new API requests
    /// get 503), in-flight requests get up to `drain_timeout` to finish, and
    /// the connection pool is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
        drain_timeout: Duration,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let Self {
            listener,
            db,
            shutdown: shutdown_ctrl,
            ..
        } = self;
        let listener =
            listener.ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        shutdown_ctrl.set_ready();
        info!("Serving HTTP on {}", listener.local_addr()?);

        let signal_ctrl = Arc::clone(&shutdown_ctrl);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Shutdown signal received, draining");
                signal_ctrl.trigger_shutdown();
            })
            .await?;

        if shutdown_ctrl.wait_for_drain(drain_timeout).await {
            info!("All requests drained");
        } else {
            warn!(
                in_flight = shutdown_ctrl.in_flight_count(),
                "Drain timeout expired with requests still in flight"
            );
        }

        db.close().await;
        Ok(())
    }
}
