pub mod api;
pub mod conversation;

use axum::{Router, middleware};
use std::sync::Arc;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Assemble every route with its per-route middleware.
///
/// Layer order on `/conversation` (outer to inner): auth -> trace -> handler.
/// Cross-cutting layers (CORS, rate limiting, security headers) are added by
/// the binary.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    let conversation_routes = conversation::create_conversation_router().layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    api::create_public_router()
        .merge(conversation_routes)
        .with_state(state)
}
