//! Per-connection lifecycle.
//!
//! ```text
//! Connecting ──gate──▶ Active(Live | Demo) ──▶ Closing ──▶ Closed
//! ```
//!
//! Every transition moves one step forward. The transport is closed at most
//! once, with 1000 for a graceful end and 1011 for a fault. A fault after the
//! client has already gone away closes nothing.

use std::fmt;
use tracing::{debug, error, info, warn};

use super::demo::run_demo;
use super::duplex::{DuplexRelay, SessionOutcome};
use super::error::RelayFailure;
use super::transport::{CloseCode, TransportReceiver, TransportSender};
use crate::core::live::{LiveConfig, LiveSession, SessionConnector};

/// What an active connection is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// A live upstream session
    Live,
    /// Canned demo replies
    Demo,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Live => write!(f, "live"),
            SessionMode::Demo => write!(f, "demo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport accepted, readiness not yet determined
    Connecting,
    Active(SessionMode),
    /// A termination condition was observed
    Closing,
    /// Transport closed, resources released
    Closed,
}

impl ConnectionState {
    fn step(self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Active(_) => 1,
            ConnectionState::Closing => 2,
            ConnectionState::Closed => 3,
        }
    }

    /// Only single forward steps are allowed.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        next.step() == self.step() + 1
    }
}

/// Final report for one connection.
#[derive(Debug)]
pub struct ConnectionReport {
    pub id: String,
    pub mode: SessionMode,
    /// Code actually sent, `None` if the close was skipped
    pub close_code: Option<CloseCode>,
    pub failure: Option<RelayFailure>,
}

/// One accepted client transport, from gate to close.
pub struct Connection {
    id: String,
    state: ConnectionState,
    sender: Box<dyn TransportSender>,
    receiver: Box<dyn TransportReceiver>,
    close_sent: bool,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        sender: Box<dyn TransportSender>,
        receiver: Box<dyn TransportReceiver>,
    ) -> Self {
        Self {
            id: id.into(),
            state: ConnectionState::Connecting,
            sender,
            receiver,
            close_sent: false,
        }
    }

    /// Drive the connection to `Closed`.
    pub async fn run(
        mut self,
        connector: &dyn SessionConnector,
        config: &LiveConfig,
    ) -> ConnectionReport {
        let session = Self::open_session(&self.id, connector, config).await;
        let mode = if session.is_some() {
            SessionMode::Live
        } else {
            SessionMode::Demo
        };
        self.transition(ConnectionState::Active(mode));
        info!(connection_id = %self.id, %mode, "Conversation active");

        let outcome = match session {
            Some(session) => {
                DuplexRelay::new(self.receiver.as_mut(), self.sender.as_mut(), session)
                    .run()
                    .await
                    .into_session_outcome()
            }
            None => run_demo(self.receiver.as_mut(), self.sender.as_mut()).await,
        };

        self.transition(ConnectionState::Closing);
        let close_code = self.finish(&outcome).await;
        self.transition(ConnectionState::Closed);

        ConnectionReport {
            id: self.id,
            mode,
            close_code,
            failure: outcome.failure,
        }
    }

    /// Ask the gate for a session; `None` means demo mode.
    ///
    /// Must not borrow the connection: the transports are not `Sync`, and
    /// `&self` held across the open would make the connection future `!Send`.
    async fn open_session(
        id: &str,
        connector: &dyn SessionConnector,
        config: &LiveConfig,
    ) -> Option<LiveSession> {
        if !connector.is_ready() {
            warn!(
                connection_id = %id,
                "Live sessions not configured, using demo mode"
            );
            return None;
        }

        match connector.open_session(config).await {
            Ok(session) => {
                debug!(
                    connection_id = %id,
                    provider = connector.provider_name(),
                    "Live session opened"
                );
                Some(session)
            }
            Err(e) => {
                warn!(
                    connection_id = %id,
                    provider = connector.provider_name(),
                    error = %e,
                    "Failed to open live session, falling back to demo mode"
                );
                None
            }
        }
    }

    async fn finish(&mut self, outcome: &SessionOutcome) -> Option<CloseCode> {
        let Some(failure) = &outcome.failure else {
            return self.close(CloseCode::Normal).await;
        };

        error!(connection_id = %self.id, %failure, "Conversation relay failed");
        if outcome.client_disconnected {
            debug!(connection_id = %self.id, "Client already disconnected, skipping close");
            return None;
        }
        self.close(CloseCode::ServerError).await
    }

    /// Close the transport once. Later calls are no-ops.
    async fn close(&mut self, code: CloseCode) -> Option<CloseCode> {
        if self.close_sent {
            return None;
        }
        self.close_sent = true;

        if let Err(e) = self.sender.close(code).await {
            debug!(connection_id = %self.id, error = %e, "Transport close failed");
        }
        info!(connection_id = %self.id, code = code.code(), "Connection closed");
        Some(code)
    }

    fn transition(&mut self, next: ConnectionState) {
        if self.state.can_transition_to(next) {
            debug!(connection_id = %self.id, from = ?self.state, to = ?next, "State transition");
            self.state = next;
        } else {
            warn!(connection_id = %self.id, from = ?self.state, to = ?next, "Rejected state transition");
        }
    }
}
