//! History page: past analyses reported by the backend.

use crate::state::Page;
use ad_protocol::AnalysisSummary;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

/// Renders the history listing as a table with the selected row highlighted.
pub fn render_history(
    frame: &mut Frame,
    area: Rect,
    page: &Page<Vec<AnalysisSummary>>,
    selected: usize,
) {
    let block = Block::default().borders(Borders::ALL).title("History");

    let analyses = match page {
        Page::Loaded(analyses) => analyses,
        Page::Unavailable(error) => {
            let paragraph = Paragraph::new(format!("History unavailable: {error}  [r] retry"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        _ => {
            frame.render_widget(Paragraph::new("Loading history...").block(block), area);
            return;
        }
    };

    let rows: Vec<Row> = analyses
        .iter()
        .map(|analysis| {
            let status = analysis.status.as_deref().unwrap_or("unknown");
            let status_style = match status {
                "completed" => Style::default().fg(Color::Green),
                "failed" | "error" => Style::default().fg(Color::Red),
                _ => Style::default().fg(Color::Yellow),
            };

            Row::new(vec![
                Cell::from(format_created(analysis)),
                Cell::from(analysis.company_name.clone().unwrap_or_default()),
                Cell::from(analysis.ticker.clone().unwrap_or_default()),
                Cell::from(status.to_string()).style(status_style),
                Cell::from(
                    analysis
                        .workflow_id
                        .clone()
                        .unwrap_or_else(|| analysis.id.clone()),
                ),
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Created"),
        Cell::from("Company"),
        Cell::from("Ticker"),
        Cell::from("Status"),
        Cell::from("Workflow"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

    let widths = [
        Constraint::Length(17),
        Constraint::Percentage(30),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Min(10),
    ];

    let title = format!("History ({})", analyses.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !analyses.is_empty() {
        table_state.select(Some(selected.min(analyses.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

/// `YYYY-MM-DD HH:MM`, or the raw value when it does not parse.
fn format_created(analysis: &AnalysisSummary) -> String {
    match analysis.created_at_time() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => analysis.created_at.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn summary(id: &str, company: &str, status: &str) -> AnalysisSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "workflowId": id,
            "companyName": company,
            "ticker": "GMRAIRPORT.NS",
            "status": status,
            "createdAt": "2025-01-01T10:10:10+05:30"
        }))
        .unwrap()
    }

    fn draw(page: &Page<Vec<AnalysisSummary>>, selected: usize) -> Terminal<TestBackend> {
        let backend = TestBackend::new(120, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_history(frame, frame.area(), page, selected);
            })
            .unwrap();
        terminal
    }

    fn content(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_history_table_rows() {
        let page = Page::Loaded(vec![
            summary("a-1", "GMR Airports Ltd", "completed"),
            summary("a-2", "Other Co", "running"),
        ]);
        let terminal = draw(&page, 0);
        let content = content(&terminal);

        assert!(content.contains("History (2)"));
        assert!(content.contains("Created"));
        assert!(content.contains("GMR Airports Ltd"));
        assert!(content.contains("2025-01-01 10:10"));
        assert!(content.contains("completed"));
        assert!(content.contains(">> "));
    }

    #[test]
    fn test_selection_is_clamped_and_highlighted() {
        let page = Page::Loaded(vec![summary("a-1", "GMR Airports Ltd", "completed")]);
        let terminal = draw(&page, 5);
        let buffer = terminal.backend().buffer();

        let highlighted = buffer.content().iter().any(|cell| cell.bg == Color::Blue);
        assert!(highlighted);
    }

    #[test]
    fn test_history_unavailable() {
        let page = Page::Unavailable("backend unreachable".to_string());
        let content = content(&draw(&page, 0));
        assert!(content.contains("History unavailable"));
        assert!(content.contains("backend unreachable"));
    }
}
