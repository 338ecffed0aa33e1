use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Login failures share one message so callers cannot tell an unknown
/// username from a wrong password or an inactive account.
pub const LOGIN_FAILED: &str = "Active user with the user name and password not found!";

/// Rotation failures fold wrong id, wrong refresh token and expired refresh
/// token into this one message for the same reason.
pub const USER_NOT_FOUND: &str = "User not found!";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    AuthenticationFailed(&'static str),

    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AuthError::AuthenticationFailed(msg) => (StatusCode::UNAUTHORIZED, (*msg).to_string()),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Store(e) => {
                // A store outage is not an authentication failure.
                error!(error = %e, "credential store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
