//! JSON body extractor with `validator` checks
//!
//! Malformed bodies and failed field rules both surface as
//! [`DomainError::Validation`](crate::domain::DomainError), so they reach the
//! client as a 400 in the usual envelope.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// Like `axum::Json<T>`, but the value has passed `Validate::validate`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateSensor {
///     #[validate(range(min = 0, max = 1000))]
///     sensor_range: i32,
/// }
///
/// async fn create(ValidatedJson(body): ValidatedJson<CreateSensor>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(format!("Invalid JSON: {}", rejection.body_text())))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// `field: message` pairs, sorted by field so the text is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed '{}' check", field, e.code),
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}
