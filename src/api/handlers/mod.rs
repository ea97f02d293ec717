pub mod events;
pub mod files;
pub mod health;

use crate::api::error::AppError;
use axum::{Json, extract::rejection::JsonRejection};

/// Turns a JSON extractor rejection into a plain-text 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
