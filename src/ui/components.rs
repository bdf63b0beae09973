//! Reusable UI components for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, Focus, ScanState};
use crate::scan::ProgressEvent;

/// Render the three input fields side by side.
pub fn render_inputs(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_input(f, columns[0], " Folder ", &app.root_input, app.focus == Focus::Root);
    render_input(f, columns[1], " File name ", &app.query_input, app.focus == Focus::Query);
    render_input(
        f,
        columns[2],
        " Exclude (comma separated) ",
        &app.exclusions_input,
        app.focus == Focus::Exclusions,
    );
}

fn render_input(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    // Keep the end of long values visible, that is where the cursor is
    let inner_width = area.width.saturating_sub(3) as usize;
    let shown = truncate_path(value, inner_width);

    let mut spans = vec![Span::raw(shown)];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );

    f.render_widget(input, area);
}

/// Render the scan progress gauge.
pub fn render_progress_bar(f: &mut Frame, area: Rect, progress: &ProgressEvent) {
    let current = progress.current_path.display().to_string();
    let label = format!(
        "{}/{} folders | {}",
        progress.folders_scanned,
        progress.folders_total,
        truncate_path(&current, (area.width as usize).saturating_sub(30).max(10)),
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(progress.ratio())
        .label(label);

    f.render_widget(gauge, area);
}

/// Render the status bar with message and scan counters.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let counters = match (&app.summary, app.state) {
        (Some(summary), ScanState::Completed | ScanState::Cancelled) => format!(
            " │ {} scanned, {} skipped in {:.1}s",
            summary.scanned,
            summary.skipped,
            summary.elapsed_ms as f64 / 1000.0
        ),
        _ => String::new(),
    };

    let text = format!("{}{}", app.message, counters);

    let bg = match app.state {
        ScanState::Failed => Color::Red,
        ScanState::Cancelled => Color::Yellow,
        _ => Color::Blue,
    };

    let status = Paragraph::new(text).style(Style::default().bg(bg).fg(Color::White));

    f.render_widget(status, area);
}

/// Render the help bar with context-sensitive key bindings.
pub fn render_help_bar(f: &mut Frame, area: Rect, app: &App) {
    let help_text = build_help_text(app);

    let help = Paragraph::new(Line::from(help_text))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    f.render_widget(help, area);
}

/// Build help text based on current app state.
fn build_help_text(app: &App) -> Vec<Span<'static>> {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let sep_style = Style::default().fg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let mut bindings: Vec<(&'static str, &'static str)> = vec![("Tab", "Next")];

    if app.is_scanning() {
        bindings.push(("Esc", "Cancel scan"));
    } else if app.focus.is_input() {
        bindings.push(("Enter", "Scan"));
    } else {
        bindings.extend([
            ("↑↓", "Navigate"),
            ("Enter/o", "Open"),
            ("c", "Copy path"),
            ("r", "Rescan"),
            ("q", "Quit"),
        ]);
    }
    bindings.push(("^C", "Quit"));

    let mut spans = Vec::new();
    for (i, (key, action)) in bindings.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", sep_style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!(":{} ", action), text_style));
    }

    spans
}

/// Truncate a path for display, keeping its tail.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        path.to_string()
    } else if max_len <= 3 {
        path.chars().skip(len - max_len).collect()
    } else {
        let tail: String = path.chars().skip(len - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}
