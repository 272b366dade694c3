//! Store-level and HTTP-level error types.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::constants::{ERR_DATABASE_OPERATION, ERR_MISSING_JSON};
use crate::models::MessageResponse;

/// Failures reported by an [ExpenseStore](crate::store::ExpenseStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The input was missing a required field or referenced a category that
    /// does not exist.
    #[error("{0}")]
    Validation(String),

    /// No record with the requested ID exists. Holds the record kind, e.g.
    /// "Expense".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected error from the underlying database.
    #[error("database error: {0}")]
    Database(#[from] libsql::Error),
}

/// The error returned by request handlers.
///
/// Every variant renders as a JSON object with a single `message` field.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The string is logged on the server and replaced with a generic
    /// message in the response.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                ERR_DATABASE_OPERATION.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Validation(message) => ApiError::BadRequest(message),
            StoreError::NotFound(kind) => ApiError::NotFound(format!("{} not found", kind)),
            StoreError::Conflict(message) => ApiError::Conflict(message),
            StoreError::Database(error) => ApiError::Internal(format!("database error: {}", error)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest(ERR_MISSING_JSON.to_string())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<libsql::Error> for ApiError {
    fn from(error: libsql::Error) -> Self {
        ApiError::Internal(format!("database error: {}", error))
    }
}
