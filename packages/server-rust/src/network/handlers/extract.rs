//! Extractors that report malformed input as [`ApiError`] JSON bodies
//! instead of axum's default plain-text rejections.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use roster_core::Validate;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body that has been deserialized and presence-checked.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        if let Some(message) = value.validate().message() {
            return Err(ApiError::Validation(message));
        }
        Ok(Self(value))
    }
}

/// Query string deserialized into `T`.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameters deserialized into `T`. A segment that does not parse
/// (`/students/abc`) is a 404, the same as an id that does not resolve.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Partial-update body. An empty body is `T::default()`, which changes
/// nothing; a non-empty one must be valid JSON.
#[derive(Debug)]
pub struct PatchBody<T>(pub T);

impl<S, T> FromRequest<S> for PatchBody<T>
where
    T: DeserializeOwned + Default + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        if let Some(message) = value.validate().message() {
            return Err(ApiError::Validation(message));
        }
        Ok(Self(value))
    }
}
