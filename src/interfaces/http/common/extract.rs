//! Path extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::{ApiError, ApiResult};

/// Positive integer record id taken from the `{id}` path segment.
///
/// Non-numeric, zero or negative ids are rejected with 400 before the
/// handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::validation(format!("Invalid path: {}", e)))?;
        parse_id(&raw).map(IdPath)
    }
}

pub fn parse_id(raw: &str) -> ApiResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!(
            "id must be a positive integer, got '{}'",
            raw
        ))),
    }
}
