//! Conversation WebSocket handler

use axum::{
    Extension,
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::socket::split_socket;
use crate::auth::Auth;
use crate::core::relay::Connection;
use crate::state::AppState;

/// Maximum WebSocket frame size (10 MB)
const MAX_WS_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Maximum WebSocket message size (10 MB)
const MAX_WS_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Conversation WebSocket handler
///
/// Upgrades the HTTP connection and hands the socket to a relay
/// [`Connection`], which decides between a live session and demo mode.
///
/// # Arguments
/// * `ws` - The WebSocket upgrade request from Axum
/// * `state` - Application state holding the readiness gate
/// * `auth` - Auth context from middleware
pub async fn conversation_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<Auth>,
) -> Response {
    let connection_id = Uuid::new_v4().to_string();
    info!(
        connection_id = %connection_id,
        authenticated = auth.is_authenticated(),
        auth_id = ?auth.id,
        "Conversation WebSocket upgrade requested"
    );

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_conversation_socket(socket, state, connection_id))
}

async fn handle_conversation_socket(socket: WebSocket, state: Arc<AppState>, connection_id: String) {
    info!(connection_id = %connection_id, "Conversation WebSocket connection established");

    let (sender, receiver) = split_socket(socket);
    let connection = Connection::new(connection_id, Box::new(sender), Box::new(receiver));
    let report = connection
        .run(state.connector.as_ref(), &state.live_config)
        .await;

    info!(
        connection_id = %report.id,
        mode = %report.mode,
        code = ?report.close_code.map(|c| c.code()),
        faults = report.failure.as_ref().map_or(0, |f| f.len()),
        "Conversation finished"
    );
}
