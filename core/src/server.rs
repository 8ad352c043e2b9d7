//! # Scan Service
//!
//! WebSocket endpoint the controller connects to. Every frame received on `/ws`
//! is a [`ScanRequest`]; each request runs as its own task and streams its
//! results back over the same socket.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use cfping_common::config::ServerConfig;
use cfping_common::protocol::{ScanRequest, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::scanner::Scanner;

pub fn router(scanner: Arc<Scanner>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(scanner)
}

/// Binds the configured address and serves until the process stops.
pub async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("binding {}", cfg.bind))?;
    serve(listener, cfg).await
}

/// Serves on an already bound listener.
pub async fn serve(listener: TcpListener, cfg: ServerConfig) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("Scan service listening on ws://{local_addr}/ws");

    let scanner = Arc::new(Scanner::new(cfg));
    axum::serve(listener, router(scanner))
        .await
        .context("scan service stopped")
}

async fn websocket_handler(ws: WebSocketUpgrade, State(scanner): State<Arc<Scanner>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, scanner))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, scanner: Arc<Scanner>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    info!("Controller connected");

    // Single writer so concurrent scans never interleave frames.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match msg.encode() {
                Ok(text) => text,
                Err(e) => {
                    error!("Dropping outgoing message: {e}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut scans: JoinSet<usize> = JoinSet::new();

    while let Some(msg) = ws_receiver.next().await {
        while scans.try_join_next().is_some() {}

        let decoded = match msg {
            Ok(Message::Text(text)) => ScanRequest::decode(text.as_str().as_bytes()),
            Ok(Message::Binary(bin)) => ScanRequest::decode(&bin),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket error: {e}");
                break;
            }
        };

        match decoded {
            Ok(req) => {
                debug!("Received {} request with {} entries", req.kind, req.ips.len());
                let scanner = scanner.clone();
                let tx = tx.clone();
                scans.spawn(async move { scanner.execute(req, tx).await });
            }
            Err(e) => warn!("Ignoring request: {e}"),
        }
    }

    scans.abort_all();
    drop(tx);
    writer.abort();
    info!("Controller disconnected");
}
