use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::{persist::StoreError, player::ValidationError, ranking::service::RankingError};

/// Failure surfaced to an HTTP caller.
#[derive(Debug)]
pub enum ApiError {
    /// Client fault: invalid submission or lookup key.
    Validation(ValidationError),
    /// Client fault: unreadable request body.
    BadRequest(String),
    /// Server fault; the full error is logged, the caller only sees
    /// [`public_message`].
    Internal(StoreError),
}

impl From<RankingError> for ApiError {
    fn from(value: RankingError) -> Self {
        match value {
            RankingError::Validation(err) => Self::Validation(err),
            RankingError::Store(err) => Self::Internal(err),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                warn!(%err, "rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": err.to_string() })),
                )
                    .into_response()
            }
            ApiError::BadRequest(msg) => {
                warn!(%msg, "unreadable request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": msg })),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                error!(%err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Internal server error",
                        "message": public_message(&err),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Caller-facing summary of a store failure. Driver text, SQL and paths stay
/// in the log.
pub fn public_message(err: &StoreError) -> &'static str {
    match err {
        StoreError::Sqlite(_) => "database error",
        StoreError::Poisoned => "store unavailable",
        StoreError::Join(_) => "store task failed",
        StoreError::Message(_) => "store error",
    }
}
