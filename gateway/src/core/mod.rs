pub mod live;
pub mod relay;

// Re-export commonly used types for convenience
pub use live::{
    GeminiConnector, LiveConfig, LiveError, LiveResult, LiveSession, ResponseFrame,
    SessionConnector, SharedConnector,
};

pub use relay::{
    CloseCode, Connection, ConnectionReport, InboundMessage, OutboundMessage, RelayError,
    RelayFailure, SessionMode, TransportError, TransportReceiver, TransportSender,
};
