/// Error types for Board Service
///
/// Only faults reach this type and all of them answer a plain-text 500.
/// Recoverable conditions (bad tracking token, unknown post, unauthorized
/// delete, unsupported method) are handled where they occur.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Result type for board-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Post store operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs
        tracing::error!(error = %self, "request failed");

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body("Internal server error")
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Internal(format!("template error: {}", err))
    }
}
