use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus};

/// Apply scan progress, then wait up to `tick` for one key press
pub fn handle_events(app: &mut App, tick: Duration) -> Result<()> {
    // Poll the background scan for progress updates (non-blocking)
    app.poll_scan();

    if event::poll(tick)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key);
            }
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global handlers - work regardless of focus
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_previous(),
        KeyCode::Esc => {
            if app.is_scanning() {
                app.cancel_scan();
            } else if app.focus == Focus::Results {
                app.focus = Focus::Root;
            }
        }
        _ if app.focus.is_input() => handle_input_key(app, key),
        _ => handle_results_key(app, key),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.start_scan(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Down => app.focus = Focus::Results,
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.results.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.results.select_next(),
        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('c') => app.copy_selected(),
        KeyCode::Char('r') => app.start_scan(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
