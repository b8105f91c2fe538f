use crossterm::event::{KeyCode, KeyEvent};
use launchpad_core::{ReportCategory, ReportDraft};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Category,
    Description,
}

/// What the form wants its owner to do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// The "Help Us Improve" report form.
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub draft: ReportDraft,
    field: ReportField,
    /// Inline validation message, cleared on the next edit.
    hint: Option<String>,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            draft: ReportDraft::default(),
            field: ReportField::Category,
            hint: None,
        }
    }
}

impl ReportForm {
    pub fn field(&self) -> ReportField {
        self.field
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    /// Empty the draft and return focus to the first field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent, scheme_id: i64) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.field = match self.field {
                    ReportField::Category => ReportField::Description,
                    ReportField::Description => ReportField::Category,
                };
                return FormAction::None;
            }
            _ => {}
        }

        match self.field {
            ReportField::Category => match key.code {
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') | KeyCode::Char('j') => {
                    let next = ReportCategory::next(self.draft.category);
                    self.draft.set_category(scheme_id, next);
                    self.hint = None;
                }
                KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => {
                    let prev = ReportCategory::prev(self.draft.category);
                    self.draft.set_category(scheme_id, prev);
                    self.hint = None;
                }
                _ => {}
            },
            ReportField::Description => match key.code {
                KeyCode::Char(c) => {
                    self.draft.push_char(scheme_id, c);
                    self.hint = None;
                }
                KeyCode::Backspace => {
                    self.draft.pop_char(scheme_id);
                    self.hint = None;
                }
                _ => {}
            },
        }
        FormAction::None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Help Us Improve ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        let focus = |field: ReportField| {
            if self.field == field {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().bold()
            }
        };

        let category = self
            .draft
            .category
            .map(|c| c.display_name())
            .unwrap_or("Select Category");

        let mut lines = vec![
            Line::from(Span::styled("Category", focus(ReportField::Category))),
            Line::from(vec![
                Span::styled("< ", Style::default().fg(Color::DarkGray)),
                Span::raw(category),
                Span::styled(" >", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(""),
            Line::from(Span::styled("Description", focus(ReportField::Description))),
            Line::from(if self.field == ReportField::Description {
                format!("{}_", self.draft.description)
            } else {
                self.draft.description.clone()
            }),
            Line::from(""),
        ];

        if let Some(ref hint) = self.hint {
            lines.push(Line::from(Span::styled(
                hint.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" submit report  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" next field  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
