use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::scan::FolderRecord;

/// Scrollable list of folders missing the queried file.
pub struct ResultList {
    entries: Vec<FolderRecord>,
    pub state: ListState,
}

impl ResultList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            state: ListState::default(),
        }
    }

    pub fn entries(&self) -> &[FolderRecord] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.state.select(None);
    }

    /// Append a folder found while the scan is still running
    pub fn push(&mut self, record: FolderRecord) {
        self.entries.push(record);
        if self.state.selected().is_none() {
            self.state.select(Some(0));
        }
    }

    /// Swap in the final list, keeping the selection when it is still valid
    pub fn replace(&mut self, entries: Vec<FolderRecord>) {
        self.entries = entries;
        let selected = match self.state.selected() {
            _ if self.entries.is_empty() => None,
            Some(i) if i < self.entries.len() => Some(i),
            _ => Some(0),
        };
        self.state.select(selected);
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&FolderRecord> {
        self.state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, is_active: bool, title: &str) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|record| {
                ListItem::new(Line::from(vec![
                    Span::raw("📁 "),
                    Span::raw(record.path().display().to_string()),
                ]))
            })
            .collect();

        let border_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", title, self.entries.len()))
            .border_style(border_style);

        // Only show selection highlight while the list has focus
        let list = if is_active {
            List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            List::new(items).block(block)
        };

        f.render_stateful_widget(list, area, &mut self.state);
    }
}

impl Default for ResultList {
    fn default() -> Self {
        Self::new()
    }
}
