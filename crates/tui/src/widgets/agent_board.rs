//! Workflow page: run status, aggregate progress and one card per agent.

use crate::state::{Page, RunView};
use ad_protocol::{AgentId, AgentStatus, FinishReason, WorkflowMetrics};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for a tick count.
pub fn spinner_glyph(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

pub fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Pending => Color::DarkGray,
        AgentStatus::Processing => Color::Yellow,
        AgentStatus::Completed => Color::Green,
    }
}

/// Renders the run header, the progress gauge and the agent cards.
pub fn render_agent_board(
    frame: &mut Frame,
    area: Rect,
    run: &RunView,
    metrics: &Page<WorkflowMetrics>,
    visualization_started: bool,
    tick: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Run state
            Constraint::Length(3), // Gauge
            Constraint::Min(6),    // Cards
        ])
        .split(area);

    render_run_state(frame, chunks[0], run, visualization_started);

    let percent = run.progress_percent();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(percent))
        .label(format!("{percent}%"));
    frame.render_widget(gauge, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[2]);

    let metrics = match metrics {
        Page::Loaded(metrics) => Some(metrics),
        _ => None,
    };
    for (agent, column) in AgentId::ALL.into_iter().zip(columns.iter()) {
        render_agent_card(frame, *column, agent, run.status(agent), metrics, tick);
    }
}

fn render_run_state(frame: &mut Frame, area: Rect, run: &RunView, visualization_started: bool) {
    let (text, style) = if run.is_running {
        let id = run.analysis_id.as_deref().unwrap_or("waiting for backend");
        (
            format!("Running analysis ({id})  [x] reset"),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(error) = &run.error {
        (
            format!("Run failed: {error}  [s] retry"),
            Style::default().fg(Color::Red),
        )
    } else if let Some(reason) = run.finished {
        let label = match reason {
            FinishReason::Completed => "Analysis complete",
            FinishReason::StreamClosed => "Stream closed",
        };
        (
            format!("{label}  [s] run again  [x] reset"),
            Style::default().fg(Color::Green),
        )
    } else if visualization_started {
        ("Ready  [s] start analysis".to_string(), Style::default())
    } else {
        (
            "Welcome. Press [s] to start the multi-agent analysis.".to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Workflow"));
    frame.render_widget(paragraph, area);
}

fn render_agent_card(
    frame: &mut Frame,
    area: Rect,
    agent: AgentId,
    status: AgentStatus,
    metrics: Option<&WorkflowMetrics>,
    tick: usize,
) {
    let color = status_color(status);
    let marker = match status {
        AgentStatus::Pending => "○",
        AgentStatus::Processing => spinner_glyph(tick),
        AgentStatus::Completed => "✓",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{marker} "), Style::default().fg(color)),
        Span::styled(
            status.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])];

    if let Some(agent_metrics) = metrics.and_then(|m| m.for_agent(agent)) {
        if !agent_metrics.description.is_empty() {
            lines.push(Line::from(Span::styled(
                agent_metrics.description.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::default());
        for metric in &agent_metrics.metrics {
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", metric.label)),
                Span::styled(
                    metric.value.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(agent.display_name()),
    );
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_protocol::{AgentMetrics, Metric};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(run: &RunView, metrics: &Page<WorkflowMetrics>, started: bool) -> Terminal<TestBackend> {
        let backend = TestBackend::new(120, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_agent_board(frame, area, run, metrics, started, 0);
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
    fn test_idle_board_shows_welcome_and_cards() {
        let terminal = render(&RunView::default(), &Page::NotLoaded, false);
        let content = content(&terminal);

        assert!(content.contains("Welcome"));
        assert!(content.contains("Stock Analyst"));
        assert!(content.contains("Company Analyst"));
        assert!(content.contains("Compliance Evaluator"));
        assert!(content.contains("0%"));
    }

    #[test]
    fn test_running_board_shows_progress_and_metrics() {
        let mut run = RunView {
            generation: 1,
            is_running: true,
            analysis_id: Some("abc123".to_string()),
            ..RunView::default()
        };
        run.agents[0] = AgentStatus::Completed;
        run.agents[1] = AgentStatus::Processing;

        let metrics = Page::Loaded(WorkflowMetrics {
            agents: vec![AgentMetrics {
                id: "stock_analyst".to_string(),
                name: "Stock Analyst".to_string(),
                description: String::new(),
                status: None,
                tasks: vec![],
                metrics: vec![Metric {
                    label: "Return".to_string(),
                    value: "+7.61%".to_string(),
                    color: None,
                }],
                output: String::new(),
            }],
            ..WorkflowMetrics::default()
        });

        let terminal = render(&run, &metrics, true);
        let content = content(&terminal);

        assert!(content.contains("abc123"));
        assert!(content.contains("33%"));
        assert!(content.contains("+7.61%"));
        assert!(content.contains("processing"));
        assert!(content.contains(spinner_glyph(0)));
    }

    #[test]
    fn test_processing_card_border_is_yellow() {
        let mut run = RunView::default();
        run.agents[2] = AgentStatus::Processing;

        let terminal = render(&run, &Page::NotLoaded, true);
        let buffer = terminal.backend().buffer();
        // Bottom-right corner belongs to the compliance card.
        let corner = &buffer[(buffer.area().width - 1, buffer.area().height - 1)];
        assert_eq!(corner.fg, Color::Yellow);
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_glyph(0), spinner_glyph(SPINNER.len()));
        assert_ne!(spinner_glyph(0), spinner_glyph(1));
    }
}
