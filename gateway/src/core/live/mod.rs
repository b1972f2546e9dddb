//! Live conversation session module.
//!
//! Abstractions for the upstream side of a conversation: a readiness gate
//! that decides whether a live session can be opened, and the split session
//! halves the relay pumps drive.
//!
//! # Supported Providers
//!
//! - **Gemini Live (Vertex AI)** - native audio with input/output transcription
//!
//! # Example
//!
//! ```rust,ignore
//! use fluentnow_gateway::core::live::{GeminiConnector, LiveConfig, SessionConnector};
//!
//! let connector = GeminiConnector::from_config(&config);
//! if connector.is_ready() {
//!     let session = connector
//!         .open_session(&LiveConfig::conversation(DEFAULT_GEMINI_MODEL, "Puck"))
//!         .await?;
//!     let (mut sender, mut receiver) = session.into_parts();
//!     sender.send_audio(chunk).await?;
//!     while let Some(frame) = receiver.next_frame().await? {
//!         // forward frame.audio / frame.text
//!     }
//! }
//! ```

mod base;
pub mod gemini;

pub use base::{
    LiveConfig, LiveError, LiveResult, LiveSession, Modality, ResponseFrame, SessionConnector,
    SessionReceiver, SessionSender, SharedConnector,
};
pub use gemini::{
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_REGION, DEFAULT_GEMINI_VOICE, GeminiConnector,
    GeminiSettings,
};
