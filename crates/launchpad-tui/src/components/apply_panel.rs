use launchpad_core::overflow::wrap;
use launchpad_core::{FetchOutcome, Panel, Scheme, SchemeDetails};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::apply::ApplyModal;

use super::centered_rect;

/// Draw the slide-in panel and whatever is stacked on it.
pub fn render(frame: &mut Frame, area: Rect, modal: &mut ApplyModal) {
    if !modal.is_open() {
        return;
    }

    let panel = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area)[1];
    frame.render_widget(Clear, panel);

    let border = if modal.visibility().blocks_background_interaction() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let title = modal
        .scheme()
        .map(|s| s.title.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Panel::Primary.title().to_string());
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let description = modal
        .scheme()
        .map(|s| s.description.clone())
        .unwrap_or_default();
    modal.overflow_mut().measure(&description, inner.width);

    let lines = panel_lines(modal, &description, inner.width);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((modal.scroll(), 0));
    frame.render_widget(paragraph, inner);

    if modal.visibility().toast() {
        let toast = Rect {
            y: panel.bottom().saturating_sub(2),
            height: 1,
            ..inner
        };
        frame.render_widget(
            Line::from(Span::styled(
                " Scheme saved for later ",
                Style::default().fg(Color::Black).bg(Color::Green),
            )),
            toast,
        );
    }

    if modal.visibility().is_open(Panel::HowToApply) {
        render_how_to_apply(frame, modal.scheme(), area);
    }
    if modal.visibility().is_open(Panel::ReportForm) {
        modal.report.render(frame, centered_rect(50, 40, area));
    }
    if modal.visibility().is_open(Panel::SavePrompt) {
        render_save_prompt(frame, area);
    }
}

fn panel_lines<'a>(modal: &ApplyModal, description: &str, width: u16) -> Vec<Line<'a>> {
    let bold = Style::default().bold();
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    let updated = modal
        .scheme()
        .and_then(Scheme::last_updated)
        .unwrap_or_else(|| "-".into());
    lines.push(Line::from(vec![
        Span::styled(format!("Last updated on {updated}"), dim),
        Span::raw("  "),
        Span::styled("[r] Report", Style::default().fg(Color::Magenta)),
    ]));
    lines.push(Line::from(""));

    let Some(scheme) = modal.scheme() else {
        push_outcome(&mut lines, modal);
        push_how_to_apply_hint(&mut lines);
        return lines;
    };

    for (label, value) in [
        ("State: ", scheme.state()),
        ("Department: ", scheme.department_name()),
        ("Beneficiaries: ", scheme.primary_beneficiary()),
    ] {
        lines.push(Line::from(vec![
            Span::styled(label, bold),
            Span::raw(value.unwrap_or("-").to_string()),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Description", bold)));
    let rows = wrap(description, width);
    let shown = modal.overflow().visible_rows().unwrap_or(rows.len());
    lines.extend(rows.into_iter().take(shown).map(Line::from));
    if let Some(label) = modal.overflow().toggle_label() {
        lines.push(Line::from(Span::styled(
            format!("[m] {label}"),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(Line::from(""));

    push_outcome(&mut lines, modal);

    if let Some(pdf) = scheme.pdf() {
        lines.push(Line::from(vec![
            Span::styled("Uploaded File: ", bold),
            Span::styled(pdf.to_string(), Style::default().fg(Color::Blue)),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(link) = scheme.apply_link() {
        lines.push(Line::from(vec![
            Span::styled("Apply: ", bold),
            Span::styled(link.to_string(), Style::default().fg(Color::Blue)),
        ]));
        lines.push(Line::from(Span::styled(
            "[s] Save for later",
            Style::default().fg(Color::Green),
        )));
    }
    push_how_to_apply_hint(&mut lines);

    lines
}

/// Criteria and documents, or whatever stands in for them until they load.
fn push_outcome<'a>(lines: &mut Vec<Line<'a>>, modal: &ApplyModal) {
    match modal.load().outcome() {
        FetchOutcome::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(""));
        }
        FetchOutcome::Failed(msg) => {
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(Span::styled(
                "[R] retry",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }
        FetchOutcome::Ready(details) => push_details(lines, details),
    }
}

fn push_how_to_apply_hint<'a>(lines: &mut Vec<Line<'a>>) {
    lines.push(Line::from(vec![
        Span::raw("Not sure how to apply? "),
        Span::styled("[h]", Style::default().fg(Color::Yellow).bold()),
        Span::raw(" to know how to apply"),
    ]));
}

fn push_details<'a>(lines: &mut Vec<Line<'a>>, details: &SchemeDetails) {
    let bold = Style::default().bold();

    lines.push(Line::from(Span::styled("Eligibility Criteria", bold)));
    if details.criteria.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none listed",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for criterion in &details.criteria {
        let text = match criterion.value.as_deref().filter(|v| !v.is_empty()) {
            Some(value) => format!("  - {}: {value}", criterion.description),
            None => format!("  - {}", criterion.description),
        };
        lines.push(Line::from(text));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Required Documents", bold)));
    if details.documents.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none listed",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for document in &details.documents {
        lines.push(Line::from(format!("  - {}", document.document_name)));
    }
    lines.push(Line::from(""));
}

fn render_how_to_apply(frame: &mut Frame, scheme: Option<&Scheme>, area: Rect) {
    let popup = centered_rect(50, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", Panel::HowToApply.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let link = scheme
        .and_then(Scheme::apply_link)
        .unwrap_or("the department's office");
    let lines = vec![
        Line::from("1. Check the eligibility criteria listed for the scheme."),
        Line::from("2. Collect the required documents."),
        Line::from(format!("3. Apply through {link}.")),
        Line::from("4. Keep the acknowledgement for tracking your application."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" close"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn render_save_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 25, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", Panel::SavePrompt.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        Line::from("Sign in to report or save schemes."),
        Line::from(Span::styled(
            "Start launchpad with --token or LAUNCHPAD_TOKEN.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" close"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
