use cfping_client::ScanController;
use cfping_client::connection::ConnectionEvent;
use cfping_common::protocol::ScanRequest;

use super::input::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Targets,
    Port,
    DownloadUrl,
    MaxLatency,
    Table,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Targets,
        Focus::Port,
        Focus::DownloadUrl,
        Focus::MaxLatency,
        Focus::Table,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct App {
    pub controller: ScanController,
    pub focus: Focus,
    /// Highlighted table row.
    pub selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: ScanController) -> Self {
        Self {
            controller,
            focus: Focus::Targets,
            selected: 0,
            should_quit: false,
        }
    }

    /// Applies a key action; returns the request to send, if the action
    /// started a scan.
    pub fn apply(&mut self, action: Action) -> Option<ScanRequest> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::Scan(kind) => return self.controller.start_scan(kind),
            Action::Retest(kind) => {
                let key = self.controller.table().rows().get(self.selected)?.key.clone();
                return self.controller.retest(&key, kind);
            }
            Action::Sort(column) => self.controller.cycle_sort(column),
            Action::SelectUp => self.selected = self.selected.saturating_sub(1),
            Action::SelectDown => {
                self.selected += 1;
                self.clamp_selection();
            }
            Action::Insert(c) => {
                if let Some(field) = self.field_mut() {
                    field.push(c);
                }
            }
            Action::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
            }
            Action::Newline => {
                if self.focus == Focus::Targets {
                    self.controller.form.targets.push('\n');
                }
            }
            Action::None => {}
        }
        None
    }

    pub fn on_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => self.controller.on_connected(),
            ConnectionEvent::Disconnected => self.controller.on_disconnected(),
            ConnectionEvent::Message(text) => self.controller.handle_text(&text),
        }
        self.clamp_selection();
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        let form = &mut self.controller.form;
        match self.focus {
            Focus::Targets => Some(&mut form.targets),
            Focus::Port => Some(&mut form.port),
            Focus::DownloadUrl => Some(&mut form.download_url),
            Focus::MaxLatency => Some(&mut form.max_latency),
            Focus::Table => None,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.table().len();
        self.selected = self.selected.min(len.saturating_sub(1));
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
