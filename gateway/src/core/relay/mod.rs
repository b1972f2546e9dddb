//! Duplex conversation relay.
//!
//! A [`Connection`] owns one client transport. Once the readiness gate has
//! resolved it is bound either to a live session, driven by the two pumps of
//! [`DuplexRelay`], or to the [demo fallback](run_demo). Either way it ends
//! with a single close carrying [`CloseCode::Normal`] or
//! [`CloseCode::ServerError`].
//!
//! # Framing
//!
//! | Direction        | Client frame | Relay action                                  |
//! |------------------|--------------|-----------------------------------------------|
//! | client → session | binary       | forwarded verbatim as realtime audio          |
//! | client → session | text         | ignored (acknowledged in demo mode)           |
//! | session → client | binary       | response audio, byte-for-byte                 |
//! | session → client | text         | `TXT:{"type":"transcript","data":"<text>"}`   |

mod connection;
mod demo;
mod duplex;
mod error;
mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use connection::{Connection, ConnectionReport, ConnectionState, SessionMode};
pub use demo::{DEMO_ACK, DEMO_INTRO, run_demo};
pub use duplex::{DEFAULT_FORWARD_TIMEOUT, DuplexRelay, PumpExit, RelayOutcome, SessionOutcome};
pub use error::{RelayError, RelayFailure, TransportError};
pub use transport::{
    CloseCode, InboundMessage, OutboundMessage, TRANSCRIPT_PREFIX, TransportReceiver,
    TransportSender,
};
