use crossterm::event::{KeyCode, KeyEvent};
use launchpad_core::Scheme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

/// The page behind the apply panel: every scheme, one per row.
pub struct SchemeList {
    schemes: Vec<Scheme>,
    list_state: ListState,
}

impl SchemeList {
    pub fn new(schemes: Vec<Scheme>) -> Self {
        let mut list_state = ListState::default();
        if !schemes.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            schemes,
            list_state,
        }
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Returns the currently highlighted scheme, if any.
    pub fn selected_scheme(&self) -> Option<&Scheme> {
        let idx = self.list_state.selected()?;
        self.schemes.get(idx)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Select by row offset from the top of the list's inner area.
    /// Returns `false` if the row has no scheme.
    pub fn select_row(&mut self, row: usize) -> bool {
        let idx = self.list_state.offset() + row;
        if idx < self.schemes.len() {
            self.list_state.select(Some(idx));
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) {
        let current = self.list_state.selected().unwrap_or(0);
        if current + 1 < self.schemes.len() {
            self.list_state.select(Some(current + 1));
        }
    }

    pub fn previous(&mut self) {
        let current = self.list_state.selected().unwrap_or(0);
        if current > 0 {
            self.list_state.select(Some(current - 1));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            // Jump to first/last
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.schemes.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                if !self.schemes.is_empty() {
                    self.list_state.select(Some(self.schemes.len() - 1));
                }
            }
            _ => {}
        }
    }

    /// `dimmed` renders the list as inactive background.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, dimmed: bool) {
        let title = format!(" Schemes ({}) ", self.schemes.len());
        let border_style = if dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let items: Vec<ListItem> = self
            .schemes
            .iter()
            .map(|scheme| {
                let state = scheme.state().unwrap_or("-");
                let title = if scheme.title.is_empty() {
                    "(untitled)"
                } else {
                    &scheme.title
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{state:<14} "), Style::default().fg(Color::Yellow)),
                    Span::raw(title.to_string()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(if dimmed { Color::DarkGray } else { Color::Cyan })
                    .bold(),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
