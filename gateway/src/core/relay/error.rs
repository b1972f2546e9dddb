//! Relay error taxonomy.
//!
//! Client disconnects and the upstream stream ending are not errors; they are
//! [`PumpExit`](super::PumpExit) values. Everything here is connection-fatal.

use std::fmt;
use thiserror::Error;

use crate::core::live::LiveError;

/// Client transport faults.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("receive failed: {0}")]
    Receive(String),

    #[error("send failed: {0}")]
    Send(String),

    /// The client is already gone
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Whether the fault means the client has already disconnected.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, TransportError::Closed)
    }
}

/// One classified pump fault.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("client transport fault: {0}")]
    Transport(#[from] TransportError),

    #[error("upstream session fault: {0}")]
    Upstream(#[from] LiveError),
}

impl RelayError {
    pub fn is_disconnect(&self) -> bool {
        matches!(self, RelayError::Transport(e) if e.is_disconnect())
    }
}

/// Every fault observed while a connection was active.
///
/// When both pumps fail close together, both errors are kept.
#[derive(Debug)]
pub struct RelayFailure {
    errors: Vec<RelayError>,
}

impl RelayFailure {
    /// `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<RelayError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self { errors })
    }

    pub fn errors(&self) -> &[RelayError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<RelayError> for RelayFailure {
    fn from(error: RelayError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} relay fault(s): ", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RelayFailure {}
