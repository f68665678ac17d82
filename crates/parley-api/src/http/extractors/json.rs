//! JSON body extractor that reports every rejection as a validation error.
//!
//! Axum's stock `Json` answers malformed bodies with 400/415/422 and a plain
//! text body. Handlers use [`ValidatedJson`] instead so that such failures,
//! and the field checks in [`Validate`], come back in the envelope format
//! with code `VALIDATION_ERROR`.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::http::error::AppError;

/// Field-level checks that serde alone cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Deserialized and validated JSON request body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate().map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

/// Reject NaN and infinite temperatures.
pub fn check_temperature(temperature: Option<f64>) -> Result<(), String> {
    match temperature {
        Some(t) if !t.is_finite() => Err(format!("temperature must be a finite number, got {t}")),
        _ => Ok(()),
    }
}
