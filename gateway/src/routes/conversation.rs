//! Conversation WebSocket route configuration

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::conversation::conversation_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the conversation WebSocket router
///
/// # Endpoint
///
/// `GET /conversation` - WebSocket upgrade into the conversation relay
///
/// # Authentication
///
/// The auth middleware is applied by [`create_app_router`](super::create_app_router).
/// Browsers pass the token as `?token=<secret>`.
pub fn create_conversation_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/conversation", get(conversation_handler))
        .layer(TraceLayer::new_for_http())
}
