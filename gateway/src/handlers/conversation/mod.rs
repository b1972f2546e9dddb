//! Conversation WebSocket endpoint
//!
//! # Protocol
//!
//! ## Client → Server
//!
//! - **Binary frames**: raw audio chunks, forwarded unmodified to the live session
//! - **Text frames**: ignored in live mode, acknowledged in demo mode
//!
//! ## Server → Client
//!
//! - **Binary frames**: response audio, byte-for-byte from the live session
//! - **Text frames**: `TXT:{"type":"transcript","data":"<text>"}`
//!
//! The server closes with `1000` when the conversation ends normally (client
//! disconnect, upstream end, demo end) and `1011` on a server-side fault.

mod handler;
mod socket;

pub use handler::conversation_handler;
pub use socket::{SocketReceiver, SocketSender, split_socket};
