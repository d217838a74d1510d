//! Translation from domain and storage errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::{AuthError, ValidationError};
use crate::storage::StorageError;

/// Error returned by every handler. Built from any `anyhow`-compatible error;
/// the status code is picked by looking at what the error wraps.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", entity))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn classify(err: &anyhow::Error) -> Option<StatusCode> {
    if err.downcast_ref::<ValidationError>().is_some() {
        return Some(StatusCode::BAD_REQUEST);
    }
    if let Some(auth) = err.downcast_ref::<AuthError>() {
        return Some(match auth {
            AuthError::Forbidden | AuthError::NotApproved => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
        });
    }
    match err.downcast_ref::<StorageError>() {
        Some(StorageError::Conflict { .. }) => Some(StatusCode::CONFLICT),
        Some(StorageError::MissingParent { .. }) => Some(StatusCode::BAD_REQUEST),
        _ => None,
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        match classify(&err) {
            Some(status) => Self::new(status, err.to_string()),
            None => {
                error!("Request failed: {:#}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Turns the storage layer's `Ok(None)` into a 404
pub trait OrNotFound<T> {
    fn or_not_found(self, entity: &str) -> Result<T, ApiError>;
}

impl<T> OrNotFound<T> for anyhow::Result<Option<T>> {
    fn or_not_found(self, entity: &str) -> Result<T, ApiError> {
        self?.ok_or_else(|| ApiError::not_found(entity))
    }
}

/// Turns a delete's `Ok(false)` into a 404
pub fn deleted(result: anyhow::Result<bool>, entity: &str) -> Result<StatusCode, ApiError> {
    if result? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(entity))
    }
}
