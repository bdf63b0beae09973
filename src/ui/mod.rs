pub mod components;
pub mod results;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, Focus};

pub use components::{
    render_help_bar, render_inputs, render_progress_bar, render_status_bar, truncate_path,
};
pub use results::ResultList;

/// Draw the whole screen
pub fn render(f: &mut Frame, app: &mut App) {
    let mut constraints = vec![Constraint::Length(3)]; // Inputs
    if app.progress.is_some() {
        constraints.push(Constraint::Length(3)); // Progress bar
    }
    constraints.push(Constraint::Min(0)); // Results
    constraints.push(Constraint::Length(1)); // Status bar
    constraints.push(Constraint::Length(1)); // Help bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    render_inputs(f, chunks[0], app);

    let mut next = 1;
    if let Some(ref progress) = app.progress {
        render_progress_bar(f, chunks[next], progress);
        next += 1;
    }

    let title = if app.is_scanning() {
        "Missing so far"
    } else {
        "Folders missing the file"
    };
    let results_active = app.focus == Focus::Results;
    app.results.render(f, chunks[next], results_active, title);

    render_status_bar(f, chunks[next + 1], app);
    render_help_bar(f, chunks[next + 2], app);
}
