//! TUI application state and event loop.
//!
//! `App` owns the mirrored [`DashboardState`], the local [`ViewState`] and
//! the channel pair to the core, and drives everything from one
//! `tokio::select!` loop.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ad_protocol::{AgentStatus, Event, Op};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::event_handler;
use crate::state::{DashboardState, Tab, ViewState};
use crate::tui::{Tui, TuiEvent};
use crate::widgets::agent_board::render_agent_board;
use crate::widgets::history_table::render_history;
use crate::widgets::report_view::render_report_page;
use crate::widgets::scroll::{wrap_text, ScrollView};

pub struct App {
    pub state: DashboardState,
    pub view: ViewState,
    /// Channel to send operations to the core.
    pub op_tx: UnboundedSender<Op>,
    /// Channel to receive events from the core.
    pub event_rx: UnboundedReceiver<Event>,
    pub should_exit: bool,
}

impl App {
    pub fn new(
        op_tx: UnboundedSender<Op>,
        event_rx: UnboundedReceiver<Event>,
        visualization_started: bool,
    ) -> Self {
        Self {
            state: DashboardState::new(visualization_started),
            view: ViewState::default(),
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();

        event_handler::request_page(&mut self.state, self.view.tab, false, &self.op_tx);
        frames.schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key_event) => {
                            self.handle_key_event(key_event);
                            frames.schedule_frame();
                        }
                        TuiEvent::Tick => {
                            self.view.tick = self.view.tick.wrapping_add(1);
                            if self.is_animating() {
                                frames.schedule_frame();
                            }
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                        }
                    }
                }
                else => break,
            }
        }

        Ok(())
    }

    fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.state, &self.view, event, &self.op_tx);
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.view,
            &mut self.state,
            &self.op_tx,
        );
    }

    /// Whether a spinner is visible and needs redrawing on each tick.
    fn is_animating(&self) -> bool {
        self.view.tab == Tab::Workflow
            && self
                .state
                .run
                .agents
                .iter()
                .any(|status| *status == AgentStatus::Processing)
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(8),    // Page
                Constraint::Length(1), // Key help
            ])
            .split(frame.area());

        let titles: Vec<Line> = Tab::ALL.iter().map(|tab| Line::from(tab.title())).collect();
        let tabs = Tabs::new(titles)
            .select(self.view.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Analysis Dashboard"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.view.tab {
            Tab::Workflow => self.render_workflow(frame, chunks[1]),
            Tab::Report(kind) => render_report_page(
                frame,
                chunks[1],
                kind,
                self.state.report(kind),
                &mut self.view.page_scroll,
            ),
            Tab::History => render_history(
                frame,
                chunks[1],
                &self.state.history,
                self.view.history_selected,
            ),
        }

        let help = Paragraph::new(
            "[s] start  [x] reset  [Tab/←/→] page  [↑/↓] scroll  [l] log  [r] reload  [q] quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn render_workflow(&mut self, frame: &mut Frame, area: Rect) {
        let (board_area, log_area) = if self.view.show_log {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        render_agent_board(
            frame,
            board_area,
            &self.state.run,
            &self.state.metrics,
            self.state.visualization_started,
            self.view.tick,
        );

        if let Some(log_area) = log_area {
            let width = ScrollView::text_width(log_area);
            let lines: Vec<Line> = if self.state.run.log.is_empty() {
                vec![Line::from("No events yet.")]
            } else {
                self.state
                    .run
                    .log
                    .iter()
                    .flat_map(|event| wrap_text(&event.log_line(), width))
                    .map(Line::from)
                    .collect()
            };
            let title = format!("Event Log ({})", self.state.run.log.len());
            self.view.log_scroll.render(frame, log_area, &title, lines);
        }
    }
}
