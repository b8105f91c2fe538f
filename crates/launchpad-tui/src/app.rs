use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use launchpad_core::{Panel, ScrollLock};
use launchpad_service::BlockingHttpService;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::apply::{ApplyModal, SaveOutcome};
use crate::components::report_form::FormAction;
use crate::components::scheme_list::SchemeList;
use crate::components::{apply_panel, centered_rect};

pub struct App {
    service: BlockingHttpService,
    list: SchemeList,
    token: Option<String>,
    scroll_lock: ScrollLock,
    apply: ApplyModal,
    /// Blocking message that takes input ahead of every panel.
    alert: Option<String>,
    status_message: Option<String>,
    /// Inner area of the list in the last frame, for mouse hits.
    list_area: Rect,
}

impl App {
    pub fn new(service: BlockingHttpService, token: Option<String>) -> Self {
        Self::with_scroll_lock(service, token, ScrollLock::new())
    }

    /// Build with a lock shared with other page-level overlays.
    pub fn with_scroll_lock(
        service: BlockingHttpService,
        token: Option<String>,
        scroll_lock: ScrollLock,
    ) -> Self {
        let mut app = Self {
            service,
            list: SchemeList::new(Vec::new()),
            token,
            apply: ApplyModal::new(scroll_lock.clone()),
            scroll_lock,
            alert: None,
            status_message: None,
            list_area: Rect::default(),
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        match self.service.list_schemes() {
            Ok(schemes) => {
                tracing::info!(count = schemes.len(), "loaded schemes");
                self.list = SchemeList::new(schemes);
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching schemes");
                self.status_message = Some(format!("Error fetching schemes: {e}"));
            }
        }
    }

    /// `q` closes panels instead of quitting while anything is stacked on the list.
    pub fn is_input_mode(&self) -> bool {
        self.alert.is_some() || self.apply.is_open()
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.apply.is_fetching()
    }

    /// Apply a finished detail fetch. Called on timeout from the event loop.
    pub fn poll_load(&mut self) -> bool {
        self.apply.poll_load()
    }

    pub fn wait_load(&mut self, timeout: Duration) -> bool {
        self.apply.wait_load(timeout)
    }

    pub fn list(&self) -> &SchemeList {
        &self.list
    }

    pub fn apply(&self) -> &ApplyModal {
        &self.apply
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Open the apply panel for the highlighted scheme.
    pub fn open_selected(&mut self) {
        let Some(scheme) = self.list.selected_scheme().cloned() else {
            return;
        };
        self.apply.present(Some(scheme), &self.service);
        self.apply.set_open(true);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;
        self.apply.hide_toast();

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        match self.apply.visibility().topmost() {
            None => self.handle_browse(key),
            Some(Panel::Primary) => self.handle_primary(key),
            Some(Panel::HowToApply) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.apply.close(Panel::HowToApply);
                }
            }
            Some(Panel::ReportForm) => self.handle_report_form(key),
            Some(Panel::SavePrompt) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.apply.close(Panel::SavePrompt);
                }
            }
        }
    }

    fn handle_browse(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('R') => self.reload(),
            _ => {
                if !self.scroll_lock.is_locked() {
                    self.list.handle_key(key);
                }
            }
        }
    }

    fn handle_primary(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.apply.set_open(false),
            KeyCode::Char('m') => self.apply.toggle_description(),
            KeyCode::Char('h') => {
                self.apply.open_how_to_apply();
            }
            KeyCode::Char('r') => {
                if self.apply.scheme().and_then(|s| s.id).is_none() {
                    self.status_message = Some("Invalid scheme data".into());
                    return;
                }
                self.apply.open_report(self.token.as_deref());
            }
            KeyCode::Char('s') => {
                if self.apply.save_for_later(&self.service, self.token.as_deref())
                    == SaveOutcome::Saved
                {
                    self.status_message = Some("Scheme saved".into());
                }
            }
            KeyCode::Char('R') => {
                if self.apply.load().error().is_some() {
                    let scheme = self.apply.scheme().cloned();
                    self.apply.present(scheme, &self.service);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.apply.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.apply.scroll_up(1),
            KeyCode::PageDown => self.apply.scroll_down(10),
            KeyCode::PageUp => self.apply.scroll_up(10),
            _ => {}
        }
    }

    fn handle_report_form(&mut self, key: KeyEvent) {
        let Some(scheme_id) = self.apply.scheme().and_then(|s| s.id) else {
            self.apply.cancel_report();
            return;
        };
        match self.apply.report.handle_key(key, scheme_id) {
            FormAction::Submit => {
                let outcome = self
                    .apply
                    .submit_report(&self.service, self.token.as_deref());
                if let Some(msg) = outcome.alert() {
                    self.alert = Some(msg.to_string());
                }
            }
            FormAction::Cancel => self.apply.cancel_report(),
            FormAction::None => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.alert.is_some() {
            return;
        }
        let topmost = self.apply.visibility().topmost();
        match mouse.kind {
            MouseEventKind::ScrollDown => match topmost {
                Some(Panel::Primary) => self.apply.scroll_down(1),
                None if !self.scroll_lock.is_locked() => self.list.next(),
                _ => {}
            },
            MouseEventKind::ScrollUp => match topmost {
                Some(Panel::Primary) => self.apply.scroll_up(1),
                None if !self.scroll_lock.is_locked() => self.list.previous(),
                _ => {}
            },
            MouseEventKind::Down(MouseButton::Left) => {
                if topmost.is_some() || self.scroll_lock.is_locked() {
                    return;
                }
                let area = self.list_area;
                let inside = mouse.column >= area.x
                    && mouse.column < area.right()
                    && mouse.row >= area.y
                    && mouse.row < area.bottom();
                if inside {
                    self.list.select_row(usize::from(mouse.row - area.y));
                }
            }
            _ => {}
        }
    }

    //  Rendering

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.list_area = Block::default().borders(Borders::ALL).inner(layout[1]);
        let dimmed = self.scroll_lock.is_locked();
        self.list.render(frame, layout[1], dimmed);
        self.render_status_bar(frame, layout[2]);

        // Overlays
        apply_panel::render(frame, layout[1], &mut self.apply);
        if let Some(ref msg) = self.alert {
            render_alert(frame, msg, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let who = if self.token.is_some() {
            Span::styled("signed in", Style::default().fg(Color::Green))
        } else {
            Span::styled("guest", Style::default().fg(Color::DarkGray))
        };
        let title = Line::from(vec![
            Span::styled(" launchpad ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.service.base_url(), Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            who,
        ]);
        frame.render_widget(title, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints: Vec<(&str, &str)> = if self.alert.is_some() {
            vec![("Enter", "ok")]
        } else {
            match self.apply.visibility().topmost() {
                None => vec![
                    ("q", "quit"),
                    ("j/k", "schemes"),
                    ("Enter", "open"),
                    ("R", "reload"),
                ],
                Some(Panel::Primary) => vec![
                    ("Esc", "close"),
                    ("j/k", "scroll"),
                    ("m", "read more"),
                    ("h", "how to apply"),
                    ("r", "report"),
                    ("s", "save"),
                    ("R", "retry"),
                ],
                Some(Panel::HowToApply) | Some(Panel::SavePrompt) => vec![("Esc", "close")],
                Some(Panel::ReportForm) => vec![
                    ("Tab", "field"),
                    ("←/→", "category"),
                    ("Enter", "submit"),
                    ("Esc", "cancel"),
                ],
            }
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(k, v)| {
                vec![
                    Span::styled(format!(" {k}"), Style::default().fg(Color::Yellow).bold()),
                    Span::styled(format!(" {v} "), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        frame.render_widget(Line::from(spans), area);
    }
}

fn render_alert(frame: &mut Frame, msg: &str, area: Rect) {
    let popup = centered_rect(40, 20, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let lines = vec![
        Line::from(msg.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" ok"),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
