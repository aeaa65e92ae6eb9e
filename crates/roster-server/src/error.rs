use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_core::StudentError;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    /// Student does not exist
    NotFound(String),

    /// Invalid input
    BadRequest(String),

    /// Uniqueness violation
    Conflict(String),

    /// Internal error
    Internal(String),

    /// Request body or query string could not be extracted
    Rejection { status: StatusCode, message: String },
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl From<StudentError> for AppError {
    fn from(err: StudentError) -> Self {
        let message = err.to_string();
        match err {
            StudentError::NotFound { .. } => AppError::NotFound(message),
            StudentError::Validation { .. } => AppError::BadRequest(message),
            StudentError::DuplicateEmail { .. } => AppError::Conflict(message),
            StudentError::Internal(_) => AppError::Internal(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg),
            AppError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    msg,
                )
            },
            AppError::Rejection { status, message } => (
                status,
                status.canonical_reason().unwrap_or("Bad Request"),
                message,
            ),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
