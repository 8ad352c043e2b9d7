//! # Scan Controller
//!
//! View state behind the scan UI: the target form, the results table, the
//! active sort, the status line and the scan-in-progress gate.
//!
//! The controller performs no I/O. User actions return the [`ScanRequest`] to
//! put on the wire (if any), and connection events are fed back in through
//! [`ScanController::on_connected`], [`ScanController::on_disconnected`] and
//! [`ScanController::handle_text`].

use cfping_common::config::RETEST_MAX_LATENCY;
use cfping_common::protocol::{ScanKind, ScanRequest, ServerMessage};
use tracing::{debug, info};

use crate::form::ScanForm;
use crate::sort::{Column, SortState};
use crate::status::StatusLine;
use crate::table::{ResultsTable, RowKey};

#[derive(Debug)]
pub struct ScanController {
    pub form: ScanForm,
    table: ResultsTable,
    sort: SortState,
    status: StatusLine,
    scanning: bool,
    connected: bool,
}

impl ScanController {
    pub fn new(form: ScanForm) -> Self {
        Self {
            form,
            table: ResultsTable::new(),
            sort: SortState::Unsorted,
            status: StatusLine::info("Connecting to server..."),
            scanning: false,
            connected: false,
        }
    }

    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the scan actions (ping, speed, single re-test) are available.
    pub fn actions_enabled(&self) -> bool {
        !self.scanning
    }

    pub fn on_connected(&mut self) {
        self.connected = true;
        self.status = StatusLine::success("Connected to server");
    }

    /// The lost session can never deliver its completion signal, so an
    /// in-flight scan is released here.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        if self.scanning {
            info!("Connection lost during a scan, releasing scan lock");
            self.scanning = false;
        }
        self.status = StatusLine::error("Disconnected. Reconnecting...");
    }

    /// Builds the request for a full run over the form's targets.
    ///
    /// Ignored while a scan is running. Rows that are about to be re-measured
    /// get their `kind` column cleared and go back to pending.
    pub fn start_scan(&mut self, kind: ScanKind) -> Option<ScanRequest> {
        if self.scanning {
            return None;
        }
        if !self.connected {
            self.status = StatusLine::error("Not connected to server");
            return None;
        }

        let parsed = self
            .form
            .port()
            .and_then(|port| self.form.max_latency().map(|max| (port, max)));
        let (port, max_latency) = match parsed {
            Ok(values) => values,
            Err(e) => {
                self.status = StatusLine::error(e.to_string());
                return None;
            }
        };

        let targets = self.form.targets();
        self.reset_column(kind, &targets, port);

        self.scanning = true;
        self.status = StatusLine::info(format!("Starting {kind} test..."));

        Some(ScanRequest {
            kind,
            ips: targets,
            port,
            download_url: self.form.download_url(),
            max_latency,
        })
    }

    /// Builds a request that re-measures a single row.
    ///
    /// Does not take the scan lock; the completion signal that follows still
    /// updates the status line.
    pub fn retest(&mut self, key: &RowKey, kind: ScanKind) -> Option<ScanRequest> {
        if self.scanning {
            return None;
        }
        if !self.connected {
            self.status = StatusLine::error("Not connected to server");
            return None;
        }

        Some(ScanRequest {
            kind,
            ips: vec![key.host.clone()],
            port: key.port,
            download_url: self.form.download_url(),
            max_latency: RETEST_MAX_LATENCY,
        })
    }

    pub fn cycle_sort(&mut self, column: Column) {
        self.sort = self.sort.cycle(column);
        self.table.sort(self.sort);
    }

    fn reset_column(&mut self, kind: ScanKind, targets: &[String], port: u16) {
        if targets.is_empty() {
            return;
        }
        let column = Column::from(kind);
        self.table.reset_column(column, targets, port);
        if self.sort.column() == Some(column) {
            self.table.sort(self.sort);
        }
    }

    pub fn handle_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Done { .. } => {
                self.scanning = false;
                self.status = StatusLine::success("Scan complete");
            }
            ServerMessage::Result(result) => {
                self.table.apply_result(&result);
                if self.sort.is_active() {
                    self.table.sort(self.sort);
                }
            }
        }
    }

    /// Applies a raw frame from the service; malformed frames are dropped.
    pub fn handle_text(&mut self, text: &str) {
        match ServerMessage::decode(text) {
            Ok(msg) => self.handle_message(msg),
            Err(e) => debug!("Dropping server frame: {e}"),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
