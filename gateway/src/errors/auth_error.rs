use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Rejections produced by the authentication gate.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication configuration error: {0}")]
    ConfigError(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_token",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::Unauthorized(_) => "unauthorized",
            AuthError::ConfigError(_) => "auth_config_error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Configuration details stay in the logs.
        let message = match &self {
            AuthError::ConfigError(_) => "Authentication is misconfigured".to_string(),
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": self.error_code(),
            "message": message,
        }));
        (status, body).into_response()
    }
}
