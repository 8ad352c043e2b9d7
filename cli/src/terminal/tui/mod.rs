pub mod app;
pub mod input;
pub mod ui;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use cfping_client::connection::{ConnectionEvent, ConnectionHandle};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use app::App;
use input::{InputHandle, map_key};

const TICK: Duration = Duration::from_millis(250);

/// Takes over the terminal until the user quits.
pub async fn run(
    app: App,
    handle: &ConnectionHandle,
    events: UnboundedReceiver<ConnectionEvent>,
) -> Result<()> {
    info!("TUI starting");

    let mut stdout = io::stdout();
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let res = run_app(&mut terminal, app, handle, events).await;

    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    terminal.show_cursor()?;

    info!("TUI stopped");
    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    handle: &ConnectionHandle,
    mut events: UnboundedReceiver<ConnectionEvent>,
) -> Result<()> {
    let (_input, mut keys) = InputHandle::start();
    let mut ticker = tokio::time::interval(TICK);

    while !app.should_quit {
        terminal.draw(|f| ui::render_ui(f, &app))?;

        tokio::select! {
            Some(key) = keys.recv() => {
                let action = map_key(key, app.focus);
                if let Some(req) = app.apply(action) {
                    info!("Sending {} request for {} targets", req.kind, req.ips.len());
                    handle.send(req)?;
                }
            }
            Some(event) = events.recv() => app.on_connection_event(event),
            _ = ticker.tick() => {}
        }
    }

    Ok(())
}
