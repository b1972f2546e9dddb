//! Demo fallback used when no live session can be opened.
//!
//! Sends the two intro transcripts, then answers every client message with
//! the same acknowledgment until the client goes away.

use tracing::debug;

use super::duplex::SessionOutcome;
use super::error::TransportError;
use super::transport::{InboundMessage, OutboundMessage, TransportReceiver, TransportSender};

/// Intro transcripts, sent in order as soon as demo mode starts.
pub const DEMO_INTRO: [&str; 2] = [
    "Hi, I'm your FluentNow speaking partner. Live conversation isn't available right now, so we're in demo mode.",
    "Go ahead and say something, and I'll let you know I heard you.",
];

/// Reply to every client message while in demo mode.
pub const DEMO_ACK: &str = "Got it! I heard you. Live replies will be back soon.";

/// Run demo mode until the client disconnects or a receive fails.
///
/// Binary and text messages are acknowledged alike. A failed send is a
/// transport fault unless the client is already gone; a failed receive just
/// ends the demo.
pub async fn run_demo(
    client_rx: &mut dyn TransportReceiver,
    client_tx: &mut dyn TransportSender,
) -> SessionOutcome {
    for line in DEMO_INTRO {
        if let Err(e) = client_tx.send(OutboundMessage::transcript(line)).await {
            return send_failed(e);
        }
    }

    loop {
        match client_rx.recv().await {
            Ok(Some(message)) => {
                let bytes = match &message {
                    InboundMessage::Audio(chunk) => chunk.len(),
                    InboundMessage::Text(text) => text.len(),
                };
                debug!(bytes, "Demo mode acknowledging client message");

                if let Err(e) = client_tx.send(OutboundMessage::transcript(DEMO_ACK)).await {
                    return send_failed(e);
                }
            }
            Ok(None) => return SessionOutcome::graceful(true),
            Err(e) => {
                debug!(error = %e, "Demo mode receive failed, ending");
                return SessionOutcome::graceful(e.is_disconnect());
            }
        }
    }
}

fn send_failed(error: TransportError) -> SessionOutcome {
    if error.is_disconnect() {
        debug!("Client gone during demo send");
        return SessionOutcome::graceful(true);
    }
    SessionOutcome::failed(error.into())
}
