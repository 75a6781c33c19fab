use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::response::ErrorResponse;

/// Business outcomes of the user service. The HTTP boundary switches on
/// the variant, never on message text.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid user id")]
    InvalidId,
    #[error("name, email and password are required")]
    MissingFields,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Email already in use")]
    EmailInUse,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::InvalidId
            | UserError::MissingFields
            | UserError::InvalidEmail
            | UserError::DuplicateEmail
            | UserError::EmailInUse => StatusCode::BAD_REQUEST,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            UserError::Unexpected(e) => {
                error!(error = %e, "unexpected service error");
                ErrorResponse {
                    success: false,
                    message: "Internal server error".to_string(),
                    error: Some(e.to_string()),
                }
            }
            other => ErrorResponse {
                success: false,
                message: other.to_string(),
                error: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
