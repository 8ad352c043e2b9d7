use cfping_client::table::{LatencyClass, Row, RowStatus};
use colored::*;

use crate::terminal::colors;

pub fn latency_color(class: LatencyClass) -> Color {
    match class {
        LatencyClass::Good => colors::LATENCY_GOOD,
        LatencyClass::Neutral => colors::LATENCY_NEUTRAL,
        LatencyClass::Bad => colors::LATENCY_BAD,
    }
}

pub fn ping_cell(row: &Row) -> ColoredString {
    match row.latency_class() {
        Some(class) => row.ping_label().color(latency_color(class)),
        None => row.ping_label().color(colors::MUTED),
    }
}

pub fn speed_cell(row: &Row) -> ColoredString {
    match row.speed {
        Some(_) => row.speed_label().color(colors::SPEED),
        None => row.speed_label().color(colors::MUTED),
    }
}

pub fn status_cell(row: &Row) -> ColoredString {
    let label: String = match &row.error {
        Some(err) => format!("{} ({})", row.status.label(), err),
        None => row.status.label().to_string(),
    };
    match row.status {
        RowStatus::Pending => label.color(colors::MUTED),
        _ if row.is_ok() => label.color(colors::LATENCY_GOOD).bold(),
        _ => label.color(colors::LATENCY_BAD),
    }
}
