use cfping_client::sort::{Column, SortDirection, SortState};
use cfping_client::status::StatusLevel;
use cfping_client::table::{LatencyClass, Row as ResultRow, RowStatus};
use ratatui::{prelude::*, widgets::*};

use super::app::{App, Focus};

const FORM_HEIGHT: u16 = 9;

pub fn render_ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORM_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_form(f, rows[0], app);
    render_status(f, rows[1], app);
    render_table(f, rows[2], app);
    render_bottom(f, rows[3], app);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn field_text(value: &str, focused: bool) -> String {
    if focused {
        format!("{value}_")
    } else {
        value.to_string()
    }
}

/// Rows to scroll so the last line of `text` stays in view.
fn scroll_offset(text: &str, visible: u16) -> u16 {
    let lines = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);
    lines.saturating_sub(visible)
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.controller.form;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let targets_focused = app.focus == Focus::Targets;
    let visible = area.height.saturating_sub(2);
    let targets = Paragraph::new(field_text(&form.targets, targets_focused))
        .scroll((scroll_offset(&form.targets, visible), 0))
        .block(field_block("Targets", targets_focused));
    f.render_widget(targets, cols[0]);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 3])
        .split(cols[1]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(fields[0]);

    let entries = [
        ("Port", &form.port, Focus::Port, top[0]),
        ("Max latency (ms)", &form.max_latency, Focus::MaxLatency, top[1]),
        ("Download URL", &form.download_url, Focus::DownloadUrl, fields[1]),
    ];
    for (title, value, focus, rect) in entries {
        let focused = app.focus == focus;
        let p = Paragraph::new(field_text(value, focused)).block(field_block(title, focused));
        f.render_widget(p, rect);
    }

    let connection = if app.controller.is_connected() {
        Span::styled("● connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("● offline", Style::default().fg(Color::Red))
    };
    let scanning = if app.controller.is_scanning() {
        Span::styled("  scanning", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![Span::raw(" "), connection, scanning])),
        fields[2],
    );
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let status = app.controller.status();
    let color = match status.level {
        StatusLevel::Info => Color::Cyan,
        StatusLevel::Success => Color::Green,
        StatusLevel::Error => Color::Red,
    };
    let p = Paragraph::new(format!(" {}", status.message))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(p, area);
}

fn sort_arrow(sort: SortState, column: Column) -> &'static str {
    match sort.direction_of(column) {
        Some(SortDirection::Ascending) => " ▲",
        Some(SortDirection::Descending) => " ▼",
        None => "",
    }
}

fn latency_color(class: LatencyClass) -> Color {
    match class {
        LatencyClass::Good => Color::Green,
        LatencyClass::Neutral => Color::Yellow,
        LatencyClass::Bad => Color::Red,
    }
}

fn status_style(row: &ResultRow) -> Style {
    match row.status {
        RowStatus::Pending => Style::default().fg(Color::DarkGray),
        _ if row.is_ok() => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Red),
    }
}

fn table_row(idx: usize, row: &ResultRow) -> Row<'static> {
    let ping_style = row
        .latency_class()
        .map(|class| Style::default().fg(latency_color(class)))
        .unwrap_or_default();
    let status = match &row.error {
        Some(err) => format!("{} ({err})", row.status.label()),
        None => row.status.label().to_string(),
    };

    Row::new(vec![
        Cell::from(idx.to_string()).style(Style::default().fg(Color::DarkGray)),
        Cell::from(row.key.host.clone()),
        Cell::from(row.key.port.to_string()),
        Cell::from(row.ping_label()).style(ping_style),
        Cell::from(row.speed_label()).style(Style::default().fg(Color::Cyan)),
        Cell::from(status).style(status_style(row)),
    ])
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let sort = app.controller.sort();
    let header = Row::new(vec![
        "#".to_string(),
        "Host".to_string(),
        "Port".to_string(),
        format!("Ping{}", sort_arrow(sort, Column::Ping)),
        format!("Speed{}", sort_arrow(sort, Column::Speed)),
        "Status".to_string(),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let result_rows = app.controller.table().rows();
    let rows = result_rows
        .iter()
        .enumerate()
        .map(|(idx, row)| table_row(idx, row));

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Min(10),
    ];

    let focused = app.focus == Focus::Table;
    let table = Table::new(rows, widths)
        .header(header)
        .block(field_block("Results", focused).title_bottom(format!(" {} ", result_rows.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if focused && !result_rows.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn bottom_hints(app: &App) -> Vec<&'static str> {
    let mut hints = vec!["Tab focus", "Esc quit"];
    if app.focus == Focus::Table {
        hints.extend(["p ping", "s speed", "r/t retest", "1/2 sort", "↑↓ select"]);
    } else {
        hints.extend(["^P ping", "^S speed"]);
    }
    hints
}

fn render_bottom(f: &mut Frame, area: Rect, app: &App) {
    let style = if app.controller.actions_enabled() {
        Style::default().bg(Color::Gray).fg(Color::Black)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::Gray)
    };
    let help = Paragraph::new(bottom_hints(app).join("   "))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE).style(style));
    f.render_widget(help, area);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
