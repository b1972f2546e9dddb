//! HTTP and WebSocket request handlers
//!
//! - `api` - Health check endpoint
//! - `conversation` - Conversation relay WebSocket

pub mod api;
pub mod conversation;

// Re-export commonly used handlers for convenient access
pub use api::health_check;
pub use conversation::conversation_handler;
