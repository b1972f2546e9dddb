//! Gemini Live client over the Vertex AI `BidiGenerateContent` WebSocket.
//!
//! # Session flow
//!
//! 1. Connect with `Authorization: Bearer <token>`
//! 2. Send `setup` and wait for `setupComplete`
//! 3. Hand the split socket to the relay: audio goes up as `realtimeInput`,
//!    every `serverContent` comes back as one [`ResponseFrame`]
//!
//! The socket halves are owned by [`GeminiSender`] and [`GeminiReceiver`];
//! dropping them releases the connection on every exit path.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use http::HeaderValue;
use http::header::AUTHORIZATION;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::config::{GEMINI_INPUT_AUDIO_MIME, GEMINI_SETUP_TIMEOUT, GeminiSettings};
use super::messages::{ClientMessage, ServerMessage};
use crate::config::ServerConfig;
use crate::core::live::base::{
    LiveConfig, LiveError, LiveResult, LiveSession, ResponseFrame, SessionConnector,
    SessionReceiver, SessionSender,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// =============================================================================
// Connector
// =============================================================================

/// Readiness gate and session factory for Gemini Live.
///
/// Ready iff a Google Cloud project is configured. A missing access token
/// does not make the gate "not ready"; it makes every open fail, which the
/// connection turns into demo mode.
#[derive(Debug, Clone)]
pub struct GeminiConnector {
    settings: GeminiSettings,
}

impl GeminiConnector {
    pub fn new(settings: GeminiSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(GeminiSettings {
            project: config.gcp_project.clone(),
            region: config.gcp_region.clone(),
            access_token: config.google_access_token.clone().map(Zeroizing::new),
            endpoint_override: None,
        })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }
}

#[async_trait]
impl SessionConnector for GeminiConnector {
    fn is_ready(&self) -> bool {
        self.settings.project.is_some()
    }

    async fn open_session(&self, config: &LiveConfig) -> LiveResult<LiveSession> {
        let project = self.settings.project.as_deref().ok_or(LiveError::NotReady)?;
        let token = self.settings.access_token.as_deref().ok_or_else(|| {
            LiveError::AuthenticationFailed("GOOGLE_ACCESS_TOKEN is not configured".to_string())
        })?;

        let url = self.settings.endpoint();
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| LiveError::InvalidConfiguration(e.to_string()))?;
        let credential = Zeroizing::new(format!("Bearer {}", token.as_str()));
        let mut bearer = HeaderValue::from_str(&credential)
            .map_err(|e| LiveError::InvalidConfiguration(e.to_string()))?;
        bearer.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (ws_stream, _response) = connect_async(request)
            .await
            .map_err(|e| LiveError::ConnectionFailed(e.to_string()))?;

        info!(model = %config.model, voice = %config.voice, "Connected to Gemini Live");

        let (mut sink, mut stream) = ws_stream.split();

        let setup = ClientMessage::setup(
            self.settings.model_resource(project, &config.model),
            config,
        );
        send_message(&mut sink, &setup).await?;

        tokio::time::timeout(GEMINI_SETUP_TIMEOUT, await_setup_complete(&mut stream))
            .await
            .map_err(|_| LiveError::Timeout("waiting for setupComplete".to_string()))??;

        debug!("Gemini Live setup complete");

        Ok(LiveSession::new(
            Box::new(GeminiSender {
                sink,
                closed: false,
            }),
            Box::new(GeminiReceiver {
                stream,
                ended: false,
            }),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

async fn send_message(
    sink: &mut SplitSink<WsStream, Message>,
    message: &ClientMessage,
) -> LiveResult<()> {
    let json = serde_json::to_string(message)
        .map_err(|e| LiveError::SerializationError(e.to_string()))?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| LiveError::WebSocketError(e.to_string()))
}

/// Read until `setupComplete`. Anything else before it is skipped.
async fn await_setup_complete(stream: &mut SplitStream<WsStream>) -> LiveResult<()> {
    while let Some(msg) = stream.next().await {
        let msg = msg.map_err(|e| LiveError::WebSocketError(e.to_string()))?;
        let payload: &[u8] = match &msg {
            Message::Text(text) => text.as_bytes(),
            Message::Binary(data) => &data[..],
            Message::Close(frame) => {
                return Err(LiveError::ConnectionFailed(format!(
                    "closed during setup: {frame:?}"
                )));
            }
            _ => continue,
        };
        if ServerMessage::from_slice(payload)?.setup_complete.is_some() {
            return Ok(());
        }
    }
    Err(LiveError::ConnectionFailed(
        "stream ended during setup".to_string(),
    ))
}

// =============================================================================
// Session Halves
// =============================================================================

/// Sending half of a Gemini Live session.
pub struct GeminiSender {
    sink: SplitSink<WsStream, Message>,
    closed: bool,
}

#[async_trait]
impl SessionSender for GeminiSender {
    async fn send_audio(&mut self, chunk: Bytes) -> LiveResult<()> {
        if self.closed {
            return Err(LiveError::NotConnected);
        }
        debug!(bytes = chunk.len(), "Forwarding audio to Gemini Live");
        send_message(
            &mut self.sink,
            &ClientMessage::audio(GEMINI_INPUT_AUDIO_MIME, &chunk),
        )
        .await
    }

    async fn close(&mut self) -> LiveResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.sink
            .send(Message::Close(None))
            .await
            .map_err(|e| LiveError::WebSocketError(e.to_string()))
    }
}

/// Receiving half of a Gemini Live session.
pub struct GeminiReceiver {
    stream: SplitStream<WsStream>,
    ended: bool,
}

#[async_trait]
impl SessionReceiver for GeminiReceiver {
    async fn next_frame(&mut self) -> LiveResult<Option<ResponseFrame>> {
        if self.ended {
            return Ok(None);
        }

        while let Some(msg) = self.stream.next().await {
            let msg = msg.map_err(|e| LiveError::WebSocketError(e.to_string()))?;
            let message = match &msg {
                Message::Text(text) => ServerMessage::from_slice(text.as_bytes())?,
                Message::Binary(data) => ServerMessage::from_slice(data)?,
                Message::Close(frame) => {
                    info!(?frame, "Gemini Live closed the session");
                    break;
                }
                _ => continue,
            };

            if let Some(content) = message.server_content {
                return content.into_frame().map(Some);
            }
            if message.go_away.is_some() {
                warn!("Gemini Live sent goAway, ending session");
                break;
            }
        }

        self.ended = true;
        Ok(None)
    }
}
