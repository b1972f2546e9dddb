//! Axum WebSocket adapter for the relay transport traits.

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::core::relay::{
    CloseCode, InboundMessage, OutboundMessage, TransportError, TransportReceiver,
    TransportSender,
};

/// Split an upgraded socket into relay transport halves.
///
/// Both halves share a `closed` flag. Once the receiver has seen the client
/// go away, sends fail with [`TransportError::Closed`]. A close frame is still
/// attempted so the closing handshake gets flushed.
pub fn split_socket(socket: WebSocket) -> (SocketSender, SocketReceiver) {
    let (sink, stream) = socket.split();
    let closed = Arc::new(AtomicBool::new(false));
    (
        SocketSender {
            sink,
            closed: closed.clone(),
            close_sent: false,
        },
        SocketReceiver { stream, closed },
    )
}

pub struct SocketReceiver {
    stream: SplitStream<WebSocket>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl TransportReceiver for SocketReceiver {
    async fn recv(&mut self) -> Result<Option<InboundMessage>, TransportError> {
        while let Some(msg) = self.stream.next().await {
            match msg {
                Ok(Message::Binary(data)) => return Ok(Some(InboundMessage::Audio(data))),
                Ok(Message::Text(text)) => {
                    return Ok(Some(InboundMessage::Text(text.as_str().to_owned())));
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Client sent close frame");
                    self.closed.store(true, Ordering::Release);
                    return Ok(None);
                }
                // Pings are answered by the protocol layer
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    self.closed.store(true, Ordering::Release);
                    return Err(TransportError::Receive(e.to_string()));
                }
            }
        }

        self.closed.store(true, Ordering::Release);
        Ok(None)
    }
}

pub struct SocketSender {
    sink: SplitSink<WebSocket, Message>,
    closed: Arc<AtomicBool>,
    close_sent: bool,
}

#[async_trait]
impl TransportSender for SocketSender {
    async fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        if self.close_sent || self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }

        let message = match message {
            OutboundMessage::Binary(data) => Message::Binary(data),
            OutboundMessage::Text(text) => Message::Text(text.into()),
        };
        self.sink.send(message).await.map_err(|e| {
            // The peer's close can land while this send is pending
            if self.closed.load(Ordering::Acquire) {
                TransportError::Closed
            } else {
                TransportError::Send(e.to_string())
            }
        })
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), TransportError> {
        if self.close_sent {
            return Ok(());
        }
        self.close_sent = true;

        let frame = CloseFrame {
            code: code.code(),
            reason: Utf8Bytes::from_static(code.reason()),
        };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}
