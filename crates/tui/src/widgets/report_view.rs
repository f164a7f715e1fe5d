//! Report pages: gate prompt, loading state, or the rendered document.

use crate::state::Page;
use crate::widgets::scroll::{wrap_text, ScrollView};
use ad_core::render::{align_table, render_section};
use ad_protocol::{ContentPart, ReportDocument, ReportKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Render a report tab.
pub fn render_report_page(
    frame: &mut Frame,
    area: Rect,
    kind: ReportKind,
    page: &Page<ReportDocument>,
    scroll: &mut ScrollView,
) {
    let message = match page {
        Page::Loaded(document) => {
            let lines = report_lines(document, ScrollView::text_width(area));
            scroll.render(frame, area, &document.title, lines);
            return;
        }
        Page::NotLoaded | Page::Loading => Line::from(format!("Loading {}...", kind.title())),
        Page::Gated => Line::from(vec![
            Span::styled(
                "No analysis has been run in this session. ",
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("Press [s] to start the workflow, then come back to this page."),
        ]),
        Page::Unavailable(error) => Line::from(vec![
            Span::styled("Report unavailable: ", Style::default().fg(Color::Red)),
            Span::raw(error.clone()),
            Span::raw("  [r] retry"),
        ]),
    };

    let paragraph = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(kind.title()));
    frame.render_widget(paragraph, area);
}

/// Lay out a document as styled lines for a pane `width` columns wide.
///
/// Prose and points are wrapped to `width`. Tables are left as they are so
/// their columns stay aligned.
pub fn report_lines(document: &ReportDocument, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for error in &document.errors {
        lines.extend(wrap_text(&format!("! {error}"), width).into_iter().map(|row| {
            Line::from(Span::styled(row, Style::default().fg(Color::Red)))
        }));
    }
    if !document.errors.is_empty() {
        lines.push(Line::default());
    }

    for section in &document.sections {
        lines.push(Line::from(Span::styled(
            section.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(path) = section.image_path() {
            lines.push(Line::from(Span::styled(
                format!("[chart: {path}]"),
                Style::default().fg(Color::DarkGray),
            )));
        }

        for part in render_section(section) {
            match part {
                ContentPart::Text { content } => {
                    lines.extend(
                        content
                            .lines()
                            .flat_map(|line| wrap_text(line, width))
                            .map(Line::from),
                    );
                }
                ContentPart::Table { headers, rows } => {
                    lines.extend(table_lines(&headers, &rows));
                }
            }
        }

        for point in &section.points {
            lines.extend(wrap_text(&format!("  • {point}"), width).into_iter().map(Line::from));
        }
        lines.push(Line::default());
    }

    lines
}

/// Aligned table, indented, header in bold.
fn table_lines(headers: &[String], rows: &[Vec<String>]) -> Vec<Line<'static>> {
    align_table(headers, rows)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("  {line}"), style))
        })
        .collect()
}
