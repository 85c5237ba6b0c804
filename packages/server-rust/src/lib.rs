//! Roster server: a JSON API over groups, students, and courses backed by
//! `SQLite`.
//!
//! Layers, bottom-up: [`storage`] (pool, per-request session, SQL),
//! [`service`] (domain operations over a session), [`network`] (axum
//! handlers, middleware, lifecycle), with [`error::ApiError`] mapping
//! outcomes to HTTP responses.

pub mod error;
pub mod network;
pub mod service;
pub mod storage;

pub use error::ApiError;
pub use network::{build_router, NetworkConfig, NetworkModule};
pub use service::ServerConfig;
pub use storage::{Database, StorageConfig};
