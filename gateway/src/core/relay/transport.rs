//! Client transport contract and outbound framing.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use super::error::TransportError;
use crate::core::live::ResponseFrame;

/// Literal prefix distinguishing transcript payloads from other text frames.
pub const TRANSCRIPT_PREFIX: &str = "TXT:";

/// A message received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Raw audio chunk, forwarded verbatim
    Audio(Bytes),
    /// Text frame
    Text(String),
}

/// A message written to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Audio, byte-for-byte as received from upstream
    Binary(Bytes),
    /// `TXT:`-prefixed JSON text
    Text(String),
}

impl OutboundMessage {
    /// Wrap transcript text as `TXT:{"type":"transcript","data":"<text>"}`.
    ///
    /// The text is JSON-string encoded, so quotes and control characters
    /// still produce a parseable payload.
    pub fn transcript(text: &str) -> Self {
        let data = serde_json::Value::String(text.to_owned());
        Self::Text(format!(
            r#"{TRANSCRIPT_PREFIX}{{"type":"transcript","data":{data}}}"#
        ))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Binary(data) => data.len(),
            Self::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseFrame {
    /// Messages to forward for this frame: audio first, then its text.
    ///
    /// Empty payloads are skipped, so a frame yields zero, one or two messages.
    pub fn into_outbound(self) -> Vec<OutboundMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(audio) = self.audio.filter(|a| !a.is_empty()) {
            messages.push(OutboundMessage::Binary(audio));
        }
        if let Some(text) = self.text.filter(|t| !t.is_empty()) {
            messages.push(OutboundMessage::transcript(&text));
        }
        messages
    }
}

/// Status code sent when the connection is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseCode {
    /// Graceful end (client disconnect, upstream end, demo end)
    Normal,
    /// Internal fault on the server side
    ServerError,
}

impl CloseCode {
    pub fn code(self) -> u16 {
        match self {
            CloseCode::Normal => 1000,
            CloseCode::ServerError => 1011,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            CloseCode::Normal => "Conversation ended",
            CloseCode::ServerError => "Server error",
        }
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Receiving half of the client transport.
///
/// `recv` must be cancel-safe: the relay drops the pending future when the
/// sibling pump terminates.
#[async_trait]
pub trait TransportReceiver: Send {
    /// Next client message, or `None` once the client has disconnected.
    async fn recv(&mut self) -> Result<Option<InboundMessage>, TransportError>;
}

/// Sending half of the client transport.
#[async_trait]
pub trait TransportSender: Send {
    async fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError>;

    /// Close the transport with a status code.
    async fn close(&mut self, code: CloseCode) -> Result<(), TransportError>;
}
