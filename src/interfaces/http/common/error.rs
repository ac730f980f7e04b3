//! Mapping of domain errors onto HTTP responses
//!
//! The status code is chosen from [`ErrorKind`], never from message text.
//! Storage failures are logged in full and reported as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::ApiResponse;
use crate::shared::errors::{DomainError, ErrorKind};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Infrastructure => match self.0 {
                DomainError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub(crate) fn public_message(&self) -> String {
        match &self.0 {
            DomainError::Validation(msg) | DomainError::Conflict(msg) => msg.clone(),
            DomainError::NotFound { entity, .. } => format!("{} not found", entity),
            DomainError::AdmissionDenied { .. } => self.0.to_string(),
            DomainError::Timeout(_) => "Storage did not respond in time, retry later".into(),
            DomainError::Storage(_) => INTERNAL_ERROR_MESSAGE.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            DomainError::Storage(raw) => error!(error = %raw, "Request failed in storage"),
            DomainError::Timeout(op) => warn!(operation = op, "Request timed out in storage"),
            _ => {}
        }
        let body = ApiResponse::<()>::error(self.public_message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::not_found("Sensor", 1), StatusCode::NOT_FOUND),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                DomainError::AdmissionDenied {
                    available: 1,
                    pending: 1,
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::Storage("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Timeout("users.find_all"), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn storage_text_is_not_exposed() {
        let response = ApiError(DomainError::Storage("no such table: users".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        assert!(!bytes.windows(5).any(|w| w == b"table"));
    }
}
