#![cfg(test)]
use std::net::SocketAddr;
use std::time::Duration;

use cfping_common::config::ServerConfig;
use cfping_common::protocol::ServerMessage;
use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Starts the scan service on a free loopback port and returns its URL.
pub async fn start_service(cfg: ServerConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(cfping_core::server::serve(listener, cfg));
    format!("ws://{addr}/ws")
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        ping_timeout: Duration::from_millis(500),
        ..ServerConfig::default()
    }
}

/// A loopback port that accepts connections while the listener lives.
pub async fn open_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port nothing listens on.
pub async fn closed_port() -> u16 {
    let (listener, port) = open_port().await;
    drop(listener);
    port
}

/// Reads server frames until the completion signal, returning everything
/// before it.
pub async fn collect_until_done(ws: &mut WsStream) -> Vec<ServerMessage> {
    let mut frames = collect_frames(ws, 1).await;
    frames.pop();
    frames
}

/// Reads server frames until `dones` completion signals have arrived,
/// signals included.
pub async fn collect_frames(ws: &mut WsStream, dones: usize) -> Vec<ServerMessage> {
    let mut frames = Vec::new();
    let mut seen: usize = 0;
    while seen < dones {
        let msg = tokio::time::timeout(Duration::from_secs(10), ws.next())
            .await
            .expect("timed out waiting for frames")
            .expect("socket closed")
            .unwrap();
        let Message::Text(text) = msg else {
            continue;
        };
        let frame = ServerMessage::decode(text.as_str()).unwrap();
        if frame.is_done() {
            seen += 1;
        }
        frames.push(frame);
    }
    frames
}

/// An HTTP endpoint that accepts one connection and never answers.
///
/// Returns its port, a signal fired once the connection is accepted and one
/// fired when the client hangs up.
pub async fn stalled_http_server() -> (u16, oneshot::Receiver<()>, oneshot::Receiver<()>) {
    let (listener, port) = open_port().await;
    let (accepted_tx, accepted_rx) = oneshot::channel();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let _ = accepted_tx.send(());
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        let _ = closed_tx.send(());
    });

    (port, accepted_rx, closed_rx)
}

/// A WebSocket endpoint that closes its first session right after the
/// handshake and keeps every later one open.
pub async fn dropping_ws_server() -> String {
    let (listener, port) = open_port().await;

    tokio::spawn(async move {
        let mut first = true;
        while let Ok((stream, _)) = listener.accept().await {
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                continue;
            };
            if first {
                first = false;
                let _ = ws.close(None).await;
                continue;
            }
            tokio::spawn(async move { while ws.next().await.is_some() {} });
        }
    });

    format!("ws://127.0.0.1:{port}/ws")
}
