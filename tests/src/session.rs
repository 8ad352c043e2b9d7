#![cfg(test)]
use std::time::Duration;

use cfping_client::connection::{self, ConnectionEvent};
use cfping_client::driver::{self, DriverError};
use cfping_client::form::ScanForm;
use cfping_client::sort::Column;
use cfping_client::status::StatusLevel;
use cfping_client::table::{RowKey, RowStatus};
use cfping_client::ScanController;
use cfping_common::config::ClientConfig;
use cfping_common::protocol::{ProbeStatus, ScanKind, ScanRequest};
use tokio::net::TcpListener;

use crate::util::{closed_port, dropping_ws_server, open_port, start_service, test_config};

const RECONNECT: Duration = Duration::from_millis(100);

fn controller(targets: &str, port: u16) -> ScanController {
    let cfg = ClientConfig {
        port,
        ..ClientConfig::default()
    };
    ScanController::new(ScanForm::from_config(&cfg).with_targets(targets))
}

#[tokio::test]
async fn ping_scan_fills_table() {
    let url = start_service(test_config()).await;
    let (_listener, open) = open_port().await;

    let mut ctl = controller("127.0.0.1\n127.0.0.2", open);
    let (handle, mut events) = connection::connect(url, RECONNECT);

    let mut updates: usize = 0;
    driver::run_to_completion(&mut ctl, &handle, &mut events, ScanKind::Ping, |_| updates += 1)
        .await
        .unwrap();

    assert!(updates >= 3);
    assert!(!ctl.is_scanning());
    assert_eq!(ctl.status().message, "Scan complete");
    assert_eq!(ctl.status().level, StatusLevel::Success);

    let row = ctl.table().get(&RowKey::new("127.0.0.1", open)).unwrap();
    assert_eq!(row.status, RowStatus::Reported(ProbeStatus::Ok));
    assert_eq!(row.order, Some(0));
    assert_eq!(ctl.table().len(), 2);
}

/// A second scan over the same targets updates rows in place.
#[tokio::test]
async fn rescan_keeps_one_row_per_target() {
    let url = start_service(test_config()).await;
    let port = closed_port().await;

    let mut ctl = controller("127.0.0.1", port);
    ctl.cycle_sort(Column::Ping);
    let (handle, mut events) = connection::connect(url, RECONNECT);

    for _ in 0..2 {
        driver::run_to_completion(&mut ctl, &handle, &mut events, ScanKind::Ping, |_| {})
            .await
            .unwrap();
    }

    assert_eq!(ctl.table().len(), 1);
    assert_eq!(
        ctl.table().rows()[0].status,
        RowStatus::Reported(ProbeStatus::Error)
    );
}

#[tokio::test]
async fn driver_fails_fast_without_service() {
    let port = closed_port().await;
    let mut ctl = controller("127.0.0.1", 443);
    let (handle, mut events) = connection::connect(format!("ws://127.0.0.1:{port}/ws"), RECONNECT);

    let err = driver::run_to_completion(&mut ctl, &handle, &mut events, ScanKind::Ping, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, DriverError::Unreachable));
    assert_eq!(ctl.status().message, "Disconnected. Reconnecting...");
}

#[tokio::test]
async fn invalid_form_is_rejected() {
    let url = start_service(test_config()).await;
    let mut ctl = controller("127.0.0.1", 443);
    ctl.form.port = "http".to_string();
    let (handle, mut events) = connection::connect(url, RECONNECT);

    let err = driver::run_to_completion(&mut ctl, &handle, &mut events, ScanKind::Ping, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, DriverError::Rejected(msg) if msg == "Invalid port 'http'"));
}

/// The connection manager keeps retrying until the service shows up.
#[tokio::test]
async fn connection_recovers_when_service_starts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_handle, mut events) = connection::connect(format!("ws://{addr}/ws"), RECONNECT);
    assert_eq!(events.recv().await, Some(ConnectionEvent::Disconnected));

    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(cfping_core::server::serve(listener, test_config()));

    next_connected(&mut events).await;
}

/// Skips `Disconnected` events from failed attempts until the next connect.
async fn next_connected(events: &mut tokio::sync::mpsc::UnboundedReceiver<ConnectionEvent>) {
    let event = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Some(ConnectionEvent::Disconnected) => continue,
                other => return other,
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(event, Some(ConnectionEvent::Connected));
}

#[tokio::test]
async fn connection_recovers_after_session_drops() {
    let url = dropping_ws_server().await;
    let (_handle, mut events) = connection::connect(url, RECONNECT);

    assert_eq!(events.recv().await, Some(ConnectionEvent::Connected));
    assert_eq!(events.recv().await, Some(ConnectionEvent::Disconnected));
    next_connected(&mut events).await;
}

/// A request sent while offline is not replayed once the link is back.
#[tokio::test]
async fn requests_queued_offline_are_discarded() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (_target, open) = open_port().await;

    let (handle, mut events) =
        connection::connect(format!("ws://{addr}/ws"), Duration::from_millis(300));
    assert_eq!(events.recv().await, Some(ConnectionEvent::Disconnected));

    handle
        .send(ScanRequest {
            kind: ScanKind::Ping,
            ips: vec!["127.0.0.1".to_string()],
            port: open,
            download_url: String::new(),
            max_latency: 0,
        })
        .unwrap();

    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(cfping_core::server::serve(listener, test_config()));
    next_connected(&mut events).await;

    let replayed = tokio::time::timeout(Duration::from_millis(500), events.recv()).await;
    assert!(replayed.is_err(), "unexpected event: {replayed:?}");
}
