//! Base traits and types for live conversation sessions.
//!
//! A live session is a bidirectional stream to a remote AI endpoint: raw audio
//! goes up, response frames carrying audio and/or transcript text come back.
//! The relay only ever sees the two halves defined here, never the vendor
//! wire format.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while opening or driving a live session.
#[derive(Debug, Error)]
pub enum LiveError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication failed or no credential is configured
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The provider sent something that violates the session protocol
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Operation timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The session has already been closed
    #[error("Not connected")]
    NotConnected,

    /// The readiness gate has no upstream capability configured
    #[error("Live sessions are not configured")]
    NotReady,
}

/// Result type for live session operations.
pub type LiveResult<T> = Result<T, LiveError>;

// =============================================================================
// Configuration Types
// =============================================================================

/// Response modality requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Audio,
    Text,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Audio => write!(f, "AUDIO"),
            Modality::Text => write!(f, "TEXT"),
        }
    }
}

/// Session configuration sent when a live session is opened.
///
/// Every connection uses the same configuration; see [`LiveConfig::conversation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Model identifier (without the project/location resource prefix)
    pub model: String,
    /// Modalities the model should answer with
    pub response_modalities: Vec<Modality>,
    /// Transcribe the user's audio
    pub input_transcription: bool,
    /// Transcribe the model's audio
    pub output_transcription: bool,
    /// Prebuilt voice name
    pub voice: String,
    /// Let the model adapt its tone to the speaker's affect
    pub affective_dialog: bool,
}

impl LiveConfig {
    /// The fixed configuration used for every conversation: audio and text
    /// responses, both transcriptions on, one named voice, affective dialog on.
    pub fn conversation(model: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            response_modalities: vec![Modality::Audio, Modality::Text],
            input_transcription: true,
            output_transcription: true,
            voice: voice.into(),
            affective_dialog: true,
        }
    }
}

// =============================================================================
// Frames
// =============================================================================

/// One unit received from the upstream session.
///
/// Either field may be absent. A frame with neither is legal and is dropped by
/// the relay rather than forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Raw audio payload, forwarded byte-for-byte
    pub audio: Option<Bytes>,
    /// Transcript text
    pub text: Option<String>,
}

impl ResponseFrame {
    pub fn audio(data: impl Into<Bytes>) -> Self {
        Self {
            audio: Some(data.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            audio: None,
            text: Some(text.into()),
        }
    }

    /// True when neither a non-empty audio payload nor non-empty text is present.
    pub fn is_empty(&self) -> bool {
        self.audio.as_ref().is_none_or(|a| a.is_empty())
            && self.text.as_ref().is_none_or(|t| t.is_empty())
    }
}

// =============================================================================
// Session Halves
// =============================================================================

/// Sending half of a live session.
#[async_trait]
pub trait SessionSender: Send {
    /// Forward one chunk of client audio as realtime input.
    async fn send_audio(&mut self, chunk: Bytes) -> LiveResult<()>;

    /// Close the upstream stream. Calling it more than once is harmless.
    async fn close(&mut self) -> LiveResult<()>;
}

/// Receiving half of a live session.
///
/// `next_frame` must be cancel-safe: the relay drops the pending future when
/// the sibling pump terminates.
#[async_trait]
pub trait SessionReceiver: Send {
    /// Next response frame, or `None` once the remote side has ended the stream.
    async fn next_frame(&mut self) -> LiveResult<Option<ResponseFrame>>;
}

/// An open live session, split so both relay pumps can own one side each.
pub struct LiveSession {
    sender: Box<dyn SessionSender>,
    receiver: Box<dyn SessionReceiver>,
}

impl LiveSession {
    pub fn new(sender: Box<dyn SessionSender>, receiver: Box<dyn SessionReceiver>) -> Self {
        Self { sender, receiver }
    }

    pub fn into_parts(self) -> (Box<dyn SessionSender>, Box<dyn SessionReceiver>) {
        (self.sender, self.receiver)
    }
}

impl fmt::Debug for LiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSession").finish_non_exhaustive()
    }
}

// =============================================================================
// Readiness Gate
// =============================================================================

/// Readiness gate and session factory.
///
/// Built once at startup and shared read-only by every connection.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Whether an upstream session capability is configured at all.
    fn is_ready(&self) -> bool;

    /// Open a new session with the given configuration.
    ///
    /// Callers fall back to demo mode when this fails.
    async fn open_session(&self, config: &LiveConfig) -> LiveResult<LiveSession>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &'static str;
}

/// Shared connector handle stored in application state.
pub type SharedConnector = Arc<dyn SessionConnector>;
