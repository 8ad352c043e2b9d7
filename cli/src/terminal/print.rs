use std::fmt::Display;
use std::time::Duration;

use cfping_client::table::Row;
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format, logging};

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 12;

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

pub fn print(msg: &str) {
    info!(target: logging::PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn aligned_line<V>(key: &str, value: V)
where
    V: Display + WithDefaultColor,
{
    let whitespace: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        whitespace.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.with_default(colors::TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

/// Pads `text` to `width` display columns, counting only visible characters.
fn pad(text: &ColoredString, width: usize) -> String {
    let rendered: String = text.to_string();
    let visible: usize = console::measure_text_width(&rendered);
    format!("{}{}", rendered, " ".repeat(width.saturating_sub(visible)))
}

pub fn results_table(rows: &[Row]) {
    let host_width: usize = rows
        .iter()
        .map(|row| UnicodeWidthStr::width(row.key.host.as_str()))
        .max()
        .unwrap_or(0)
        .max(4);

    let head: String = format!(
        "{}  {}  {}  {}  {}  {}",
        pad(&"#".color(colors::SEPARATOR), 4),
        pad(&"HOST".color(colors::PRIMARY), host_width),
        pad(&"PORT".color(colors::PRIMARY), 5),
        pad(&"PING".color(colors::PRIMARY), 9),
        pad(&"SPEED".color(colors::PRIMARY), 12),
        "STATUS".color(colors::PRIMARY),
    );
    print(&head);

    for (idx, row) in rows.iter().enumerate() {
        let line: String = format!(
            "{}  {}  {}  {}  {}  {}",
            pad(&idx.to_string().color(colors::ACCENT), 4),
            pad(&row.key.host.as_str().color(colors::TEXT_DEFAULT), host_width),
            pad(&row.key.port.to_string().color(colors::SEPARATOR), 5),
            pad(&format::ping_cell(row), 9),
            pad(&format::speed_cell(row), 12),
            format::status_cell(row),
        );
        print(&line);
    }
}

const NO_RESULTS: &str = r#"
         _   _  ___    ____  _____ ____  _   _ _   _____ ____
        | \ | |/ _ \  |  _ \| ____/ ___|| | | | | |_   _/ ___|
        |  \| | | | | | |_) |  _| \___ \| | | | |   | | \___ \
        | |\  | |_| | |  _ <| |___ ___) | |_| | |___| |  ___) |
        |_| \_|\___/  |_| \_\_____|____/ \___/|_____|_| |____/
"#;

pub fn no_results() {
    print(&format!("{}", NO_RESULTS.red().bold()));
}

pub fn summary(rows: &[Row], elapsed: Duration) {
    let ok: usize = rows.iter().filter(|row| row.is_ok()).count();
    fat_separator();
    aligned_line("Results", rows.len().to_string());
    aligned_line("Reachable", ok.to_string().color(colors::LATENCY_GOOD));
    aligned_line("Failed", (rows.len() - ok).to_string().color(colors::LATENCY_BAD));
    aligned_line("Elapsed", format!("{:.2}s", elapsed.as_secs_f64()));
}
