//! Duplex relay: two pumps sharing one fail-together lifecycle.
//!
//! Both pumps are driven by `tokio::join!` inside the connection's task, so
//! they interleave cooperatively and never run in parallel. Each pump holds a
//! drop guard on a shared [`CancellationToken`]; whichever exits first (for
//! any reason) cancels its sibling, and `join!` waits for both to settle.
//!
//! Cancellation is only observed while a pump is waiting for its next input.
//! A forward that is already in flight completes (or fails) first, so no
//! message is ever half-written. Every forward is bounded by the relay's
//! forward timeout; a stalled forward is a fault, which in turn cancels the
//! sibling pump.
//!
//! A client transport that reports [`TransportError::Closed`] on either side
//! ends its pump with [`PumpExit::ClientDisconnected`], not a fault.

use bytes::Bytes;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{RelayError, RelayFailure, TransportError};
use super::transport::{
    InboundMessage, OutboundMessage, TransportReceiver, TransportSender,
};
use crate::core::live::{LiveError, LiveSession, SessionReceiver, SessionSender};

/// Upper bound on a single forward in either direction.
pub const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a pump stopped without faulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// The client went away
    ClientDisconnected,
    /// The upstream response stream ended normally
    UpstreamEnded,
    /// The sibling pump terminated first
    Cancelled,
}

/// Settled result of both pumps.
#[derive(Debug)]
pub struct RelayOutcome {
    pub inbound: Result<PumpExit, RelayError>,
    pub outbound: Result<PumpExit, RelayError>,
}

impl RelayOutcome {
    /// Whether the client transport is known to be gone.
    pub fn client_disconnected(&self) -> bool {
        [&self.inbound, &self.outbound].into_iter().any(|r| match r {
            Ok(exit) => *exit == PumpExit::ClientDisconnected,
            Err(e) => e.is_disconnect(),
        })
    }

    /// Fold both results into the connection-level outcome.
    pub fn into_session_outcome(self) -> SessionOutcome {
        let client_disconnected = self.client_disconnected();
        let errors = [self.inbound, self.outbound]
            .into_iter()
            .filter_map(Result::err)
            .collect();

        SessionOutcome {
            client_disconnected,
            failure: RelayFailure::from_errors(errors),
        }
    }
}

/// What the connection needs to know to close the transport.
#[derive(Debug, Default)]
pub struct SessionOutcome {
    pub client_disconnected: bool,
    pub failure: Option<RelayFailure>,
}

impl SessionOutcome {
    pub fn graceful(client_disconnected: bool) -> Self {
        Self {
            client_disconnected,
            failure: None,
        }
    }

    pub fn failed(error: RelayError) -> Self {
        Self {
            client_disconnected: error.is_disconnect(),
            failure: Some(error.into()),
        }
    }
}

/// Binds one client transport to one live session for the lifetime of an
/// active connection.
pub struct DuplexRelay<'a> {
    client_rx: &'a mut dyn TransportReceiver,
    client_tx: &'a mut dyn TransportSender,
    session: LiveSession,
    forward_timeout: Duration,
}

impl<'a> DuplexRelay<'a> {
    pub fn new(
        client_rx: &'a mut dyn TransportReceiver,
        client_tx: &'a mut dyn TransportSender,
        session: LiveSession,
    ) -> Self {
        Self {
            client_rx,
            client_tx,
            session,
            forward_timeout: DEFAULT_FORWARD_TIMEOUT,
        }
    }

    /// Replace [`DEFAULT_FORWARD_TIMEOUT`].
    pub fn forward_timeout(mut self, limit: Duration) -> Self {
        self.forward_timeout = limit;
        self
    }

    /// Run both pumps until both have settled, then release the session.
    pub async fn run(self) -> RelayOutcome {
        let (mut session_tx, mut session_rx) = self.session.into_parts();
        let cancel = CancellationToken::new();

        let (inbound, outbound) = tokio::join!(
            pump_client_to_session(
                self.client_rx,
                session_tx.as_mut(),
                &cancel,
                self.forward_timeout
            ),
            pump_session_to_client(
                session_rx.as_mut(),
                self.client_tx,
                &cancel,
                self.forward_timeout
            ),
        );

        match timeout(self.forward_timeout, session_tx.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Upstream session close failed"),
            Err(_) => debug!("Upstream session close timed out"),
        }

        debug!(?inbound, ?outbound, "Relay pumps settled");
        RelayOutcome { inbound, outbound }
    }
}

/// Client audio → session, one forward per received chunk.
async fn pump_client_to_session(
    client: &mut dyn TransportReceiver,
    session: &mut dyn SessionSender,
    cancel: &CancellationToken,
    forward_timeout: Duration,
) -> Result<PumpExit, RelayError> {
    let _guard = cancel.clone().drop_guard();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PumpExit::Cancelled),
            next = client.recv() => next,
        };

        match next {
            Ok(None) | Err(TransportError::Closed) => return Ok(PumpExit::ClientDisconnected),
            Err(e) => return Err(e.into()),
            Ok(Some(InboundMessage::Audio(chunk))) => {
                forward_chunk(session, chunk, forward_timeout).await?
            }
            Ok(Some(InboundMessage::Text(text))) => {
                debug!(bytes = text.len(), "Ignoring client text frame");
            }
        }
    }
}

async fn forward_chunk(
    session: &mut dyn SessionSender,
    chunk: Bytes,
    limit: Duration,
) -> Result<(), RelayError> {
    debug!(bytes = chunk.len(), "client -> session");
    timeout(limit, session.send_audio(chunk))
        .await
        .map_err(|_| LiveError::Timeout(format!("audio forward stalled for {limit:?}")))??;
    Ok(())
}

/// Forward one message to the client. `Ok(false)` means the client is gone.
async fn forward_message(
    client: &mut dyn TransportSender,
    message: OutboundMessage,
    limit: Duration,
) -> Result<bool, RelayError> {
    debug!(bytes = message.len(), "session -> client");
    match timeout(limit, client.send(message)).await {
        Ok(Ok(())) => Ok(true),
        Ok(Err(TransportError::Closed)) => Ok(false),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(TransportError::Send(format!("client send stalled for {limit:?}")).into()),
    }
}

/// Session frames → client, audio before text, in arrival order.
async fn pump_session_to_client(
    session: &mut dyn SessionReceiver,
    client: &mut dyn TransportSender,
    cancel: &CancellationToken,
    forward_timeout: Duration,
) -> Result<PumpExit, RelayError> {
    let _guard = cancel.clone().drop_guard();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PumpExit::Cancelled),
            next = session.next_frame() => next?,
        };

        let Some(frame) = next else {
            return Ok(PumpExit::UpstreamEnded);
        };

        for message in frame.into_outbound() {
            if !forward_message(client, message, forward_timeout).await? {
                return Ok(PumpExit::ClientDisconnected);
            }
        }
    }
}
