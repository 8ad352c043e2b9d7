use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICK_FRAMES: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

/// Progress line for a one-shot scan. Log output is routed above it.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(
            "{spinner:.blue} {msg} {pos:>5.green.bold}/{len:<5.bold} {elapsed:.dim}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_FRAMES);

        bar.set_style(style);
        bar.set_message("results");
        bar.enable_steady_tick(TICK_INTERVAL);
        Self { bar }
    }

    /// Prints above the bar; still prints once the bar is hidden or done.
    pub fn println(&self, msg: &str) {
        self.bar.suspend(|| eprintln!("{msg}"));
    }

    fn update(&self, received: usize, submitted: usize) {
        self.bar.set_length(submitted as u64);
        // Rows can outnumber entries when CIDR blocks expand server-side.
        if received > submitted {
            self.bar.set_message("results (expanded)");
            self.bar.set_length(received as u64);
        }
        self.bar.set_position(received as u64);
    }
}

static PROGRESS: OnceLock<ScanProgress> = OnceLock::new();

pub fn get_progress() -> &'static ScanProgress {
    PROGRESS.get_or_init(ScanProgress::new)
}

pub fn report_scan_progress(received: usize, submitted: usize) {
    get_progress().update(received, submitted);
}

pub fn finish() {
    if let Some(progress) = PROGRESS.get() {
        progress.bar.finish_and_clear();
    }
}

pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        get_progress().println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
