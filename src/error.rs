// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}};
use tracing::error;

use crate::upstream::UpstreamError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    RateLimited,
    /// Upstream payload had an unexpected shape; the reason stays server-side.
    UpstreamContract(String),
    Upstream(UpstreamError),
    DatabaseError(sqlx::Error),
    Timeout(&'static str),
    NotFound(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Bad Request: {msg}")),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests".to_string()),
            AppError::UpstreamContract(reason) => {
                error!(%reason, "Upstream response failed validation");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Upstream(e) => {
                error!(error = %e, "Upstream request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::DatabaseError(e) => {
                error!(?e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Timeout(stage) => {
                error!(stage, "Request stage timed out");
                (StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, message).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::RateLimited => AppError::RateLimited,
            UpstreamError::Contract(reason) => AppError::UpstreamContract(reason),
            UpstreamError::Timeout => AppError::Timeout("upstream"),
            other => AppError::Upstream(other),
        }
    }
}
