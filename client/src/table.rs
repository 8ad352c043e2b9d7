//! Result rows keyed by `(host, port)`, kept in display order.

use std::fmt;

use cfping_common::protocol::{ProbeStatus, ScanResult};

use crate::sort::{Column, SortState};

const LATENCY_GOOD_BELOW_MS: i64 = 100;
const LATENCY_BAD_ABOVE_MS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub host: String,
    pub port: u16,
}

impl RowKey {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Waiting for a result from the current run.
    Pending,
    Reported(ProbeStatus),
}

impl RowStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::Pending => "PENDING",
            RowStatus::Reported(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
    Good,
    Neutral,
    Bad,
}

impl LatencyClass {
    pub fn of(ms: i64) -> Self {
        if ms < LATENCY_GOOD_BELOW_MS {
            LatencyClass::Good
        } else if ms > LATENCY_BAD_ABOVE_MS {
            LatencyClass::Bad
        } else {
            LatencyClass::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: RowKey,
    /// Position in the submitted target list, when the service reported one.
    pub order: Option<usize>,
    pub ping: Option<i64>,
    pub speed: Option<f64>,
    pub status: RowStatus,
    pub error: Option<String>,
}

impl Row {
    pub fn new(key: RowKey, order: Option<usize>) -> Self {
        Self {
            key,
            order,
            ping: None,
            speed: None,
            status: RowStatus::Pending,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, RowStatus::Reported(status) if status.is_ok())
    }

    pub fn latency_class(&self) -> Option<LatencyClass> {
        self.ping.map(LatencyClass::of)
    }

    pub fn ping_label(&self) -> String {
        match self.ping {
            Some(ms) => format!("{ms} ms"),
            None => "-".to_string(),
        }
    }

    pub fn speed_label(&self) -> String {
        match self.speed {
            Some(speed) => format!("{speed:.2} MB/s"),
            None => "-".to_string(),
        }
    }

    fn apply(&mut self, result: &ScanResult) {
        if result.ping_time > 0 {
            self.ping = Some(result.ping_time);
        }
        if result.download > 0.0 {
            self.speed = Some(result.download);
        }
        self.status = RowStatus::Reported(result.status);
        self.error = result.error_msg.clone();
    }

    fn clear(&mut self, column: Column) {
        match column {
            Column::Ping => self.ping = None,
            Column::Speed => self.speed = None,
        }
        self.status = RowStatus::Pending;
    }
}

#[derive(Debug, Default, Clone)]
pub struct ResultsTable {
    rows: Vec<Row>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| &row.key == key)
    }

    fn position(&self, key: &RowKey) -> Option<usize> {
        self.rows.iter().position(|row| &row.key == key)
    }

    /// Records a result, creating its row on first sight.
    ///
    /// Returns `true` when a new row was added.
    pub fn apply_result(&mut self, result: &ScanResult) -> bool {
        let key = RowKey::new(result.ip.clone(), result.port);
        let (idx, created) = match self.position(&key) {
            Some(idx) => (idx, false),
            None => (self.insert(Row::new(key, result.order)), true),
        };
        self.rows[idx].apply(result);
        created
    }

    /// New rows with an order land before the first row that comes later in
    /// the input; the rest are appended.
    fn insert(&mut self, row: Row) -> usize {
        let Some(order) = row.order else {
            self.rows.push(row);
            return self.rows.len() - 1;
        };

        let idx = self
            .rows
            .iter()
            .position(|existing| existing.order.unwrap_or(usize::MAX) > order)
            .unwrap_or(self.rows.len());
        self.rows.insert(idx, row);
        idx
    }

    /// Clears `column` and marks the row pending for every `(target, port)`
    /// already in the table. Returns how many rows were reset.
    pub fn reset_column(&mut self, column: Column, targets: &[String], port: u16) -> usize {
        let mut reset: usize = 0;
        for target in targets {
            let key = RowKey::new(target.as_str(), port);
            if let Some(idx) = self.position(&key) {
                self.rows[idx].clear(column);
                reset += 1;
            }
        }
        reset
    }

    pub fn sort(&mut self, state: SortState) {
        if self.rows.len() <= 1 {
            return;
        }
        self.rows.sort_by(|a, b| state.compare(a, b));
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
