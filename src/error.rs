use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum NumgenError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl IntoResponse for NumgenError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            NumgenError::Validation(msg) | NumgenError::Precondition(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            NumgenError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            NumgenError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            NumgenError::Database(e) => {
                error!(error = %e, "database failure while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
            NumgenError::PasswordHash(e) => {
                error!(error = %e, "password hashing failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

/// Standardized API error response body: `{"error": "<message>"}`.
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
