#![cfg(test)]
use cfping_common::config::ServerConfig;
use cfping_common::protocol::{ProbeStatus, ScanResult, ServerMessage};
use futures::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use std::time::Duration;

use crate::util::{
    closed_port, collect_frames, collect_until_done, open_port, stalled_http_server,
    start_service, test_config,
};

fn results(frames: Vec<ServerMessage>) -> Vec<ScanResult> {
    frames
        .into_iter()
        .map(|frame| match frame {
            ServerMessage::Result(result) => result,
            other => panic!("unexpected frame: {other:?}"),
        })
        .collect()
}

/// A ping of a listening loopback port yields one ok result, then done.
#[tokio::test]
async fn ping_reports_ok_then_done() {
    let url = start_service(test_config()).await;
    let (_listener, port) = open_port().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    let req = json!({
        "type": "ping",
        "ips": ["127.0.0.1"],
        "port": port,
        "download_url": "",
        "max_latency": 0,
    });
    ws.send(Message::text(req.to_string())).await.unwrap();

    let found = results(collect_until_done(&mut ws).await);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ip, "127.0.0.1");
    assert_eq!(found[0].port, port);
    assert_eq!(found[0].order, Some(0));
    assert_eq!(found[0].status, ProbeStatus::Ok);
}

#[tokio::test]
async fn refused_port_reports_error_with_message() {
    let url = start_service(test_config()).await;
    let port = closed_port().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    let req = json!({ "type": "ping", "ips": ["127.0.0.1"], "port": port });
    ws.send(Message::text(req.to_string())).await.unwrap();

    let found = results(collect_until_done(&mut ws).await);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].status, ProbeStatus::Error);
    assert!(found[0].error_msg.is_some());
}

/// Garbage frames are dropped and the session keeps serving.
#[tokio::test]
async fn malformed_request_is_ignored() {
    let url = start_service(test_config()).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    ws.send(Message::text("not a request")).await.unwrap();
    ws.send(Message::text(r#"{"type":"trace","ips":[],"port":1}"#))
        .await
        .unwrap();
    let req = json!({ "type": "ping", "ips": [], "port": 443 });
    ws.send(Message::text(req.to_string())).await.unwrap();

    assert!(collect_until_done(&mut ws).await.is_empty());
}

#[tokio::test]
async fn cidr_expansion_is_capped() {
    let cfg = ServerConfig {
        max_targets: 3,
        ..test_config()
    };
    let url = start_service(cfg).await;
    let port = closed_port().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    let req = json!({ "type": "ping", "ips": ["127.0.0.0/29"], "port": port });
    ws.send(Message::text(req.to_string())).await.unwrap();

    let mut found = results(collect_until_done(&mut ws).await);
    found.sort_by_key(|result| result.order);

    let ips: Vec<&str> = found.iter().map(|result| result.ip.as_str()).collect();
    assert_eq!(ips, vec!["127.0.0.1", "127.0.0.2", "127.0.0.3"]);
    let orders: Vec<Option<usize>> = found.iter().map(|result| result.order).collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
}

/// Requests sent back to back run side by side, each ending in its own done.
#[tokio::test]
async fn concurrent_scans_share_one_socket() {
    let url = start_service(test_config()).await;
    let (_listener, open) = open_port().await;
    let refused = closed_port().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    for port in [open, refused] {
        let req = json!({ "type": "ping", "ips": ["127.0.0.1"], "port": port });
        ws.send(Message::text(req.to_string())).await.unwrap();
    }

    let frames = collect_frames(&mut ws, 2).await;
    assert_eq!(frames.iter().filter(|frame| frame.is_done()).count(), 2);

    let mut found = results(frames.into_iter().filter(|frame| !frame.is_done()).collect());
    found.sort_by_key(|result| result.port == refused);
    assert_eq!(found.len(), 2);
    assert_eq!((found[0].port, found[0].status), (open, ProbeStatus::Ok));
    assert_eq!((found[1].port, found[1].status), (refused, ProbeStatus::Error));
}

/// Closing the socket cancels its in-flight probes instead of letting them
/// run to their timeout.
#[tokio::test]
async fn closing_socket_aborts_running_scan() {
    let cfg = ServerConfig {
        speed_timeout: Duration::from_secs(30),
        ..test_config()
    };
    let url = start_service(cfg).await;
    let (port, accepted, closed) = stalled_http_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    let req = json!({
        "type": "speed",
        "ips": ["127.0.0.1"],
        "port": port,
        "download_url": "http://speed.invalid/file",
    });
    ws.send(Message::text(req.to_string())).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), accepted)
        .await
        .expect("speed probe never connected")
        .unwrap();

    ws.close(None).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), closed)
        .await
        .expect("probe kept running after the socket closed")
        .unwrap();
}
