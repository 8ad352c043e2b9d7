use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use cfping_client::sort::Column;
use cfping_common::protocol::ScanKind;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::error;

use super::app::Focus;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    Scan(ScanKind),
    Retest(ScanKind),
    Sort(Column),
    SelectUp,
    SelectDown,
    Insert(char),
    Backspace,
    Newline,
    None,
}

pub fn map_key(key: KeyEvent, focus: Focus) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Char('p') if ctrl => return Action::Scan(ScanKind::Ping),
        KeyCode::Char('s') if ctrl => return Action::Scan(ScanKind::Speed),
        KeyCode::Esc => return Action::Quit,
        KeyCode::Tab => return Action::FocusNext,
        KeyCode::BackTab => return Action::FocusPrev,
        _ if ctrl => return Action::None,
        _ => {}
    }

    if focus == Focus::Table {
        return match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('p') => Action::Scan(ScanKind::Ping),
            KeyCode::Char('s') => Action::Scan(ScanKind::Speed),
            KeyCode::Char('r') => Action::Retest(ScanKind::Ping),
            KeyCode::Char('t') => Action::Retest(ScanKind::Speed),
            KeyCode::Char('1') => Action::Sort(Column::Ping),
            KeyCode::Char('2') => Action::Sort(Column::Speed),
            KeyCode::Up | KeyCode::Char('k') => Action::SelectUp,
            KeyCode::Down | KeyCode::Char('j') => Action::SelectDown,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Enter => Action::Newline,
        _ => Action::None,
    }
}

/// Reads terminal events on a blocking thread and forwards key presses.
pub struct InputHandle {
    stop: Arc<AtomicBool>,
}

impl InputHandle {
    pub fn start() -> (Self, UnboundedReceiver<KeyEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        error!("Input poll failed: {e}");
                        break;
                    }
                }
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Input read failed: {e}");
                        break;
                    }
                }
            }
        });

        (Self { stop }, rx)
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
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
