//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and validates it with the
//! `validator` crate. Both malformed bodies and failed rules are rejected
//! with 400 and the standard error envelope; rule failures carry field-level
//! details.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use messenger_core::{MessengerError, ValidateExt};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that validates the deserialized value.
///
/// ```ignore
/// async fn save(ValidatedJson(request): ValidatedJson<CreateUserRequest>) {
///     // request passed every validation rule here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError(MessengerError::validation(format!(
                "Invalid JSON: {}",
                rejection.body_text()
            )))
        })?;

        value.validate_request()?;

        Ok(ValidatedJson(value))
    }
}
