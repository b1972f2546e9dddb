//! Scripted transports, sessions and connectors for relay tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use super::error::TransportError;
use super::transport::{CloseCode, InboundMessage, OutboundMessage, TransportReceiver, TransportSender};
use crate::core::live::{
    LiveConfig, LiveError, LiveResult, LiveSession, ResponseFrame, SessionConnector,
    SessionReceiver, SessionSender,
};

// =============================================================================
// Client Transport
// =============================================================================

enum ClientInput {
    Message(InboundMessage),
    Disconnect,
    Fail(TransportError),
}

/// Drives what the relay receives from the client.
#[derive(Clone)]
pub(crate) struct ClientHandle {
    tx: mpsc::UnboundedSender<ClientInput>,
}

impl ClientHandle {
    pub fn audio(&self, chunk: impl Into<Bytes>) {
        let _ = self.tx.send(ClientInput::Message(InboundMessage::Audio(chunk.into())));
    }

    pub fn text(&self, text: &str) {
        let _ = self
            .tx
            .send(ClientInput::Message(InboundMessage::Text(text.to_string())));
    }

    pub fn disconnect(&self) {
        let _ = self.tx.send(ClientInput::Disconnect);
    }

    pub fn fail(&self, error: TransportError) {
        let _ = self.tx.send(ClientInput::Fail(error));
    }
}

pub(crate) struct MockReceiver {
    rx: mpsc::UnboundedReceiver<ClientInput>,
    disconnected: bool,
}

#[async_trait]
impl TransportReceiver for MockReceiver {
    async fn recv(&mut self) -> Result<Option<InboundMessage>, TransportError> {
        if self.disconnected {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(ClientInput::Message(message)) => Ok(Some(message)),
            Some(ClientInput::Fail(error)) => Err(error),
            Some(ClientInput::Disconnect) | None => {
                self.disconnected = true;
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportEvent {
    Sent(OutboundMessage),
    Closed(CloseCode),
}

/// Everything written to a [`RecordingSender`], shared with the test.
#[derive(Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<TransportEvent>>>);

impl EventLog {
    fn push(&self, event: TransportEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TransportEvent::Sent(message) => Some(message),
                TransportEvent::Closed(_) => None,
            })
            .collect()
    }

    pub fn close_codes(&self) -> Vec<CloseCode> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TransportEvent::Closed(code) => Some(code),
                TransportEvent::Sent(_) => None,
            })
            .collect()
    }
}

#[derive(Default)]
enum SendBehavior {
    #[default]
    Record,
    /// Wait, then fail with a send error
    FailAfter(Duration),
    /// Accept this many sends, then report the client as gone
    DisconnectAfter(usize),
    /// Never complete
    Stall,
}

pub(crate) struct RecordingSender {
    log: EventLog,
    behavior: SendBehavior,
}

impl RecordingSender {
    /// Every send waits `delay`, then fails.
    pub fn fail_sends_after(&mut self, delay: Duration) {
        self.behavior = SendBehavior::FailAfter(delay);
    }

    /// Accept `count` sends, then fail with [`TransportError::Closed`] the way
    /// the socket adapter does once the peer has closed.
    pub fn disconnect_after_sends(&mut self, count: usize) {
        self.behavior = SendBehavior::DisconnectAfter(count);
    }

    pub fn stall_sends(&mut self) {
        self.behavior = SendBehavior::Stall;
    }
}

#[async_trait]
impl TransportSender for RecordingSender {
    async fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        match self.behavior {
            SendBehavior::Record => {}
            SendBehavior::FailAfter(delay) => {
                tokio::time::sleep(delay).await;
                return Err(TransportError::Send("broken pipe".to_string()));
            }
            SendBehavior::DisconnectAfter(count) => {
                if self.log.sent().len() >= count {
                    return Err(TransportError::Closed);
                }
            }
            SendBehavior::Stall => std::future::pending::<()>().await,
        }
        self.log.push(TransportEvent::Sent(message));
        Ok(())
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), TransportError> {
        self.log.push(TransportEvent::Closed(code));
        Ok(())
    }
}

pub(crate) struct MockClient {
    pub receiver: MockReceiver,
    pub sender: RecordingSender,
    pub log: EventLog,
}

impl MockClient {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.log.sent()
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.log.events()
    }
}

pub(crate) fn mock_client() -> (MockClient, ClientHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let log = EventLog::default();
    let client = MockClient {
        receiver: MockReceiver {
            rx,
            disconnected: false,
        },
        sender: RecordingSender {
            log: log.clone(),
            behavior: SendBehavior::default(),
        },
        log,
    };
    (client, ClientHandle { tx })
}

// =============================================================================
// Upstream Session
// =============================================================================

enum UpstreamEvent {
    Frame(ResponseFrame),
    End,
    Fail(LiveError),
}

#[derive(Default)]
struct UpstreamState {
    chunks: Vec<Bytes>,
    closed: bool,
    fail_after: Option<usize>,
    stalled: bool,
}

/// Scripts the upstream side and records what it was sent.
#[derive(Clone)]
pub(crate) struct MockUpstream {
    tx: mpsc::UnboundedSender<UpstreamEvent>,
    state: Arc<Mutex<UpstreamState>>,
}

impl MockUpstream {
    pub fn frame(&self, frame: ResponseFrame) {
        let _ = self.tx.send(UpstreamEvent::Frame(frame));
    }

    pub fn end(&self) {
        let _ = self.tx.send(UpstreamEvent::End);
    }

    pub fn fail(&self, error: LiveError) {
        let _ = self.tx.send(UpstreamEvent::Fail(error));
    }

    /// Accept `count` chunks, then fail every forward.
    pub fn fail_send_after(&self, count: usize) {
        self.state.lock().unwrap().fail_after = Some(count);
    }

    /// Every forward hangs.
    pub fn stall_sends(&self) {
        self.state.lock().unwrap().stalled = true;
    }

    pub fn received_chunks(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().chunks.clone()
    }

    pub fn was_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

struct MockSessionSender {
    state: Arc<Mutex<UpstreamState>>,
}

#[async_trait]
impl SessionSender for MockSessionSender {
    async fn send_audio(&mut self, chunk: Bytes) -> LiveResult<()> {
        let stalled = self.state.lock().unwrap().stalled;
        if stalled {
            std::future::pending::<()>().await;
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_after.is_some_and(|n| state.chunks.len() >= n) {
            return Err(LiveError::ConnectionFailed("upstream reset".to_string()));
        }
        state.chunks.push(chunk);
        Ok(())
    }

    async fn close(&mut self) -> LiveResult<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

struct MockSessionReceiver {
    rx: mpsc::UnboundedReceiver<UpstreamEvent>,
    ended: bool,
}

#[async_trait]
impl SessionReceiver for MockSessionReceiver {
    async fn next_frame(&mut self) -> LiveResult<Option<ResponseFrame>> {
        if self.ended {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(UpstreamEvent::Frame(frame)) => Ok(Some(frame)),
            Some(UpstreamEvent::Fail(error)) => Err(error),
            Some(UpstreamEvent::End) | None => {
                self.ended = true;
                Ok(None)
            }
        }
    }
}

pub(crate) fn mock_session() -> (LiveSession, MockUpstream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let state = Arc::new(Mutex::new(UpstreamState::default()));
    let session = LiveSession::new(
        Box::new(MockSessionSender {
            state: state.clone(),
        }),
        Box::new(MockSessionReceiver { rx, ended: false }),
    );
    (session, MockUpstream { tx, state })
}

// =============================================================================
// Readiness Gate
// =============================================================================

pub(crate) struct MockConnector {
    ready: bool,
    session: Mutex<Option<LiveSession>>,
    opens: AtomicUsize,
}

impl MockConnector {
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            session: Mutex::new(None),
            opens: AtomicUsize::new(0),
        }
    }

    /// Ready, but every open fails.
    pub fn failing() -> Self {
        Self {
            ready: true,
            ..Self::not_ready()
        }
    }

    /// Ready, and hands out `session` on the first open.
    pub fn with_session(session: LiveSession) -> Self {
        Self {
            ready: true,
            session: Mutex::new(Some(session)),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionConnector for MockConnector {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn open_session(&self, _config: &LiveConfig) -> LiveResult<LiveSession> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.session
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| LiveError::ConnectionFailed("connection refused".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
