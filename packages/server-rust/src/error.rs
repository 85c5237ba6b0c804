//! Error taxonomy at the HTTP boundary.
//!
//! Domain operations never fail for "not found"; handlers turn those
//! outcomes into [`ApiError::NotFound`] themselves. Storage errors arrive as
//! [`StoreError`] and are split into client-facing constraint violations and
//! server faults.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_core::Message;
use tracing::{error, warn};

use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An id or name did not resolve.
    #[error("{0}")]
    NotFound(String),
    /// A write was rejected by a uniqueness or reference constraint.
    #[error("{0}")]
    Constraint(String),
    /// A required field is missing or has the wrong type.
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Replaces the database's constraint message with `message`; other
    /// storage errors stay faults.
    #[must_use]
    pub fn from_store(err: StoreError, message: &str) -> Self {
        match err {
            StoreError::Constraint(detail) => {
                warn!(%detail, "constraint violation");
                Self::Constraint(message.to_string())
            }
            other => Self::Storage(other),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Constraint(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(detail) => Self::Constraint(detail),
            other => Self::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::NotFound(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::Storage(err) => {
                error!(error = %err, "request failed on storage");
                "Internal server error".to_string()
            }
            Self::NotFound(m) | Self::Constraint(m) | Self::Validation(m) => m,
        };
        (status, Json(Message::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::not_found("Student not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Constraint("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation("missing".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(StoreError::Database(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn from_store_rewrites_constraint_message_only() {
        let err = ApiError::from_store(
            StoreError::Constraint("UNIQUE constraint failed: groups.name".into()),
            "Group with this name already exists",
        );
        assert!(matches!(&err, ApiError::Constraint(m) if m == "Group with this name already exists"));

        let err = ApiError::from_store(
            StoreError::Database(sqlx::Error::PoolClosed),
            "Group with this name already exists",
        );
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[tokio::test]
    async fn storage_errors_hide_details_from_clients() {
        let response =
            ApiError::Storage(StoreError::Database(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let message: Message = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "Internal server error");
    }
}
