//! # Connection Manager
//!
//! Keeps a WebSocket to the scan service open for as long as the handle lives.
//! Connection state changes and inbound frames are reported as
//! [`ConnectionEvent`]s; a dropped or refused connection is retried after a
//! fixed delay, without backoff.

use std::time::Duration;

use cfping_common::protocol::ScanRequest;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
    /// A text frame, passed on undecoded.
    Message(String),
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection manager has stopped")]
    Closed,
}

pub struct ConnectionHandle {
    outgoing: UnboundedSender<ScanRequest>,
    task: JoinHandle<()>,
}

impl ConnectionHandle {
    /// Queues a request for the current connection.
    pub fn send(&self, req: ScanRequest) -> Result<(), ConnectionError> {
        self.outgoing.send(req).map_err(|_| ConnectionError::Closed)
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Starts the connection loop for `url`.
pub fn connect(
    url: impl Into<String>,
    reconnect_delay: Duration,
) -> (ConnectionHandle, UnboundedReceiver<ConnectionEvent>) {
    let url: String = url.into();
    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel::<ScanRequest>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ConnectionEvent>();

    let task = tokio::spawn(connection_loop(url, reconnect_delay, outgoing_rx, event_tx));

    (
        ConnectionHandle {
            outgoing: outgoing_tx,
            task,
        },
        event_rx,
    )
}

async fn connection_loop(
    url: String,
    reconnect_delay: Duration,
    mut outgoing: UnboundedReceiver<ScanRequest>,
    events: UnboundedSender<ConnectionEvent>,
) {
    loop {
        info!("Connecting to scan service at {url}");

        match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((ws_stream, _response)) => {
                info!("Connected to scan service");
                if events.send(ConnectionEvent::Connected).is_err() {
                    return;
                }

                let (mut sink, mut stream) = ws_stream.split();

                loop {
                    tokio::select! {
                        req = outgoing.recv() => {
                            let Some(req) = req else {
                                let _ = sink.close().await;
                                return;
                            };
                            match req.encode() {
                                Ok(text) => {
                                    if let Err(e) = sink.send(Message::text(text)).await {
                                        warn!("Failed to send request: {e}");
                                        break;
                                    }
                                }
                                Err(e) => warn!("Dropping request: {e}"),
                            }
                        }
                        msg = stream.next() => match msg {
                            Some(Ok(Message::Text(text))) => {
                                let frame = ConnectionEvent::Message(text.as_str().to_owned());
                                if events.send(frame).is_err() {
                                    return;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                info!("Scan service closed the connection");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                warn!("WebSocket error: {e}");
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => warn!("Failed to connect to {url}: {e}"),
        }

        if events.send(ConnectionEvent::Disconnected).is_err() {
            return;
        }

        tokio::time::sleep(reconnect_delay).await;

        // Requests issued while offline belong to no session.
        while let Ok(req) = outgoing.try_recv() {
            debug!("Discarding {} request queued while disconnected", req.kind);
        }
    }
}
