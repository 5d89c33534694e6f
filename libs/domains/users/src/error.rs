use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("User already exists, email exists")]
    DuplicateEmail(String),

    #[error("Otp is not valid")]
    InvalidOtp,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Verify your email first!")]
    NotVerified,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        // Plain `{"message": ...}` bodies. An invalid OTP reports 404
        // like a missing user, and a duplicate email reports 400: both
        // are part of the public contract and kept as-is.
        let (status, message) = match &self {
            UserError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            UserError::DuplicateEmail(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            UserError::InvalidOtp => (StatusCode::NOT_FOUND, self.to_string()),
            UserError::WrongPassword => (StatusCode::BAD_REQUEST, self.to_string()),
            UserError::NotVerified => (StatusCode::BAD_REQUEST, self.to_string()),
            UserError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            UserError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
