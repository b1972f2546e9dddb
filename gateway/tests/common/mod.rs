//! Shared fixtures for the gateway integration tests.
//!
//! - `test_config` - minimal `ServerConfig` with no upstream project
//! - `ScriptedConnector` - readiness gate whose sessions are driven by the test
//! - `spawn_server` - the full app router on an ephemeral port

// Not every test binary uses every helper
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use fluentnow_gateway::config::{AuthApiSecret, ServerConfig};
use fluentnow_gateway::core::live::{
    LiveConfig, LiveError, LiveResult, LiveSession, ResponseFrame, SessionConnector,
    SessionReceiver, SessionSender, SharedConnector,
};
use fluentnow_gateway::{AppState, routes};

/// Minimal configuration: demo mode, no auth
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        gcp_project: None,
        gcp_region: "us-central1".to_string(),
        google_access_token: None,
        live_model: "gemini-live-2.5-flash-preview-native-audio".to_string(),
        live_voice: "Puck".to_string(),
        auth_api_secrets: Vec::new(),
        auth_required: false,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 60,
        rate_limit_burst_size: 10,
    }
}

/// Configuration requiring a bearer token
pub fn auth_config(secret: &str) -> ServerConfig {
    let mut config = test_config();
    config.auth_required = true;
    config.auth_api_secrets = vec![AuthApiSecret {
        id: "web".to_string(),
        secret: secret.to_string(),
    }];
    config
}

/// Serve the full app router on 127.0.0.1 with an ephemeral port.
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    let app = routes::create_app_router(state);

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

// =============================================================================
// Scripted live session
// =============================================================================

pub enum UpstreamEvent {
    Frame(ResponseFrame),
    End,
    Fail(LiveError),
}

/// Test-side handle on a scripted session.
#[derive(Clone)]
pub struct UpstreamScript {
    events: mpsc::UnboundedSender<UpstreamEvent>,
    chunks: Arc<Mutex<Vec<Bytes>>>,
}

impl UpstreamScript {
    pub fn frame(&self, frame: ResponseFrame) {
        let _ = self.events.send(UpstreamEvent::Frame(frame));
    }

    pub fn end(&self) {
        let _ = self.events.send(UpstreamEvent::End);
    }

    pub fn fail(&self, error: LiveError) {
        let _ = self.events.send(UpstreamEvent::Fail(error));
    }

    pub fn received_chunks(&self) -> Vec<Bytes> {
        self.chunks.lock().unwrap().clone()
    }

    /// Poll until `count` chunks have been forwarded upstream.
    pub async fn wait_for_chunks(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.received_chunks().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("chunks were not forwarded in time");
    }
}

struct ScriptedSender {
    chunks: Arc<Mutex<Vec<Bytes>>>,
    fail_after: Option<usize>,
}

#[async_trait]
impl SessionSender for ScriptedSender {
    async fn send_audio(&mut self, chunk: Bytes) -> LiveResult<()> {
        let mut chunks = self.chunks.lock().unwrap();
        if self.fail_after.is_some_and(|n| chunks.len() >= n) {
            return Err(LiveError::WebSocketError("upstream reset".to_string()));
        }
        chunks.push(chunk);
        Ok(())
    }

    async fn close(&mut self) -> LiveResult<()> {
        Ok(())
    }
}

struct ScriptedReceiver {
    events: mpsc::UnboundedReceiver<UpstreamEvent>,
}

#[async_trait]
impl SessionReceiver for ScriptedReceiver {
    async fn next_frame(&mut self) -> LiveResult<Option<ResponseFrame>> {
        match self.events.recv().await {
            Some(UpstreamEvent::Frame(frame)) => Ok(Some(frame)),
            Some(UpstreamEvent::Fail(error)) => Err(error),
            Some(UpstreamEvent::End) | None => Ok(None),
        }
    }
}

enum Gate {
    NotReady,
    FailOpen,
    Session(Mutex<Option<LiveSession>>),
}

/// Readiness gate with a fixed, test-controlled behavior.
pub struct ScriptedConnector {
    gate: Gate,
}

impl ScriptedConnector {
    pub fn not_ready() -> SharedConnector {
        Arc::new(Self {
            gate: Gate::NotReady,
        })
    }

    pub fn failing_open() -> SharedConnector {
        Arc::new(Self {
            gate: Gate::FailOpen,
        })
    }

    /// One live session; forwards fail once `fail_after` chunks were accepted.
    pub fn live(fail_after: Option<usize>) -> (SharedConnector, UpstreamScript) {
        let (tx, rx) = mpsc::unbounded_channel();
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let session = LiveSession::new(
            Box::new(ScriptedSender {
                chunks: chunks.clone(),
                fail_after,
            }),
            Box::new(ScriptedReceiver { events: rx }),
        );
        let connector: SharedConnector = Arc::new(Self {
            gate: Gate::Session(Mutex::new(Some(session))),
        });
        (connector, UpstreamScript { events: tx, chunks })
    }
}

#[async_trait]
impl SessionConnector for ScriptedConnector {
    fn is_ready(&self) -> bool {
        !matches!(self.gate, Gate::NotReady)
    }

    async fn open_session(&self, _config: &LiveConfig) -> LiveResult<LiveSession> {
        match &self.gate {
            Gate::NotReady => Err(LiveError::NotReady),
            Gate::FailOpen => Err(LiveError::ConnectionFailed("connection refused".to_string())),
            Gate::Session(slot) => slot
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| LiveError::ConnectionFailed("session already used".to_string())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
