use crate::auth::{Auth, match_api_secret_id};
use crate::errors::auth_error::AuthError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Extract authentication token from request
///
/// Supports two token sources for browser/WebSocket compatibility:
/// 1. Authorization header: `Authorization: Bearer <token>` (preferred)
/// 2. Query parameter: `?token=<token>` (browsers cannot set WebSocket headers)
fn extract_token(request: &Request) -> Result<String, AuthError> {
    if let Some(auth_header) = request.headers().get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            tracing::debug!("Token extracted from Authorization header");
            return Ok(token.to_string());
        }
        return Err(AuthError::InvalidAuthHeader);
    }

    if let Some(query) = request.uri().query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "token" {
                tracing::debug!("Token extracted from query parameter");
                return Ok(value.to_string());
            }
        }
    }

    Err(AuthError::MissingAuthHeader)
}

/// Authentication middleware that validates bearer tokens against the
/// configured API secrets.
///
/// When `auth_required` is off, every request passes with an empty [`Auth`]
/// context so handlers can always extract one. Otherwise the token is matched
/// in constant time and the matching secret id is attached to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.config.auth_required {
        tracing::debug!("Authentication disabled, inserting empty Auth context");
        request.extensions_mut().insert(Auth::empty());
        return Ok(next.run(request).await);
    }

    let request_path = request.uri().path().to_string();

    if !state.config.has_api_secret_auth() {
        return Err(AuthError::ConfigError(
            "Authentication required but no API secrets configured".to_string(),
        ));
    }

    let token = extract_token(&request)?;

    match match_api_secret_id(&token, &state.config.auth_api_secrets) {
        Some(secret_id) => {
            tracing::info!(
                path = %request_path,
                auth_id = %secret_id,
                "API secret authentication successful"
            );
            request.extensions_mut().insert(Auth::new(secret_id));
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!(
                path = %request_path,
                "API secret authentication failed: token mismatch"
            );
            Err(AuthError::Unauthorized("Invalid API secret".to_string()))
        }
    }
}
