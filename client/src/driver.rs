//! Headless use of the controller: connect, run one scan, wait for completion.

use cfping_common::protocol::ScanKind;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::connection::{ConnectionError, ConnectionEvent, ConnectionHandle};
use crate::controller::ScanController;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("scan service is unreachable")]
    Unreachable,
    #[error("scan was not started: {0}")]
    Rejected(String),
    #[error("connection lost before the scan completed")]
    ConnectionLost,
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Waits for the connection, submits a `kind` scan of the form's targets and
/// applies results until the completion signal arrives.
///
/// Unlike the interactive UI this gives up as soon as the first connection
/// attempt fails.
///
/// `on_update` runs after every applied frame.
pub async fn run_to_completion<F>(
    controller: &mut ScanController,
    handle: &ConnectionHandle,
    events: &mut UnboundedReceiver<ConnectionEvent>,
    kind: ScanKind,
    mut on_update: F,
) -> Result<(), DriverError>
where
    F: FnMut(&ScanController),
{
    while !controller.is_connected() {
        match events.recv().await {
            Some(ConnectionEvent::Connected) => controller.on_connected(),
            Some(ConnectionEvent::Disconnected) => {
                controller.on_disconnected();
                return Err(DriverError::Unreachable);
            }
            Some(ConnectionEvent::Message(_)) => debug!("Ignoring frame received before the scan"),
            None => return Err(ConnectionError::Closed.into()),
        }
    }

    let req = controller
        .start_scan(kind)
        .ok_or_else(|| DriverError::Rejected(controller.status().message.clone()))?;
    handle.send(req)?;
    on_update(controller);

    while controller.is_scanning() {
        match events.recv().await {
            Some(ConnectionEvent::Message(text)) => {
                controller.handle_text(&text);
                on_update(controller);
            }
            Some(ConnectionEvent::Disconnected) => {
                controller.on_disconnected();
                return Err(DriverError::ConnectionLost);
            }
            Some(ConnectionEvent::Connected) => controller.on_connected(),
            None => return Err(ConnectionError::Closed.into()),
        }
    }

    Ok(())
}
