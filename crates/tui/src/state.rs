//! What the TUI knows about the core, rebuilt from [`Event`]s.
//!
//! Run events carry a generation number; anything older than the newest
//! generation seen is dropped so a late message from a cancelled run never
//! shows up on screen.
//!
//! [`Event`]: ad_protocol::Event

use ad_protocol::{
    AgentId, AgentStatus, AnalysisSummary, FinishReason, ProgressEvent, ReportDocument, ReportKind,
    WorkflowMetrics,
};
use crate::widgets::ScrollView;
use std::collections::HashMap;

/// Top-level tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Workflow,
    Report(ReportKind),
    History,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Workflow,
        Tab::Report(ReportKind::Stock),
        Tab::Report(ReportKind::Investment),
        Tab::Report(ReportKind::Compliance),
        Tab::History,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Workflow => "Workflow",
            Tab::Report(ReportKind::Stock) => "Stock",
            Tab::Report(ReportKind::Investment) => "Investment",
            Tab::Report(ReportKind::Compliance) => "Compliance",
            Tab::History => "History",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Lifecycle of a page backed by a core request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Page<T> {
    #[default]
    NotLoaded,
    Loading,
    /// Report pages only: no run has been started this session.
    Gated,
    Loaded(T),
    Unavailable(String),
}

impl<T> Page<T> {
    /// Whether switching to this page should issue a request.
    pub fn needs_load(&self) -> bool {
        matches!(self, Page::NotLoaded | Page::Gated)
    }
}

/// Mirror of the run controller.
#[derive(Debug, Clone, Default)]
pub struct RunView {
    pub generation: u64,
    pub is_running: bool,
    pub agents: [AgentStatus; 3],
    pub log: Vec<ProgressEvent>,
    pub analysis_id: Option<String>,
    pub finished: Option<FinishReason>,
    pub error: Option<String>,
}

impl RunView {
    pub fn status(&self, agent: AgentId) -> AgentStatus {
        self.agents[agent.index()]
    }

    pub fn progress_percent(&self) -> u8 {
        ad_protocol::progress_percent(&self.agents)
    }

    /// Accept an event for `generation`, resetting on a newer one.
    ///
    /// Returns `false` for events of an older run.
    fn accept(&mut self, generation: u64) -> bool {
        if generation < self.generation {
            return false;
        }
        if generation > self.generation {
            *self = RunView {
                generation,
                ..RunView::default()
            };
        }
        true
    }
}

/// Purely local UI state: which page is shown and where it is scrolled.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub tab: Tab,
    pub show_log: bool,
    /// Event log position on the workflow page.
    pub log_scroll: ScrollView,
    /// Position on the current report page.
    pub page_scroll: ScrollView,
    pub history_selected: usize,
    /// Spinner frame counter.
    pub tick: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::Workflow,
            show_log: true,
            log_scroll: ScrollView::new(),
            page_scroll: ScrollView::new(),
            history_selected: 0,
            tick: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub run: RunView,
    /// A run has been started at some point, possibly in an earlier session.
    pub visualization_started: bool,
    pub metrics: Page<WorkflowMetrics>,
    pub reports: HashMap<ReportKind, Page<ReportDocument>>,
    pub history: Page<Vec<AnalysisSummary>>,
}

impl DashboardState {
    pub fn new(visualization_started: bool) -> Self {
        Self {
            visualization_started,
            ..Self::default()
        }
    }

    pub fn report(&self, kind: ReportKind) -> &Page<ReportDocument> {
        static NOT_LOADED: Page<ReportDocument> = Page::NotLoaded;
        self.reports.get(&kind).unwrap_or(&NOT_LOADED)
    }

    pub fn set_report(&mut self, kind: ReportKind, page: Page<ReportDocument>) {
        self.reports.insert(kind, page);
    }

    /// Apply one core event.
    pub fn apply(&mut self, event: ad_protocol::Event) {
        use ad_protocol::Event;

        match event {
            Event::RunStarted { generation } => {
                if self.run.accept(generation) {
                    self.run.is_running = true;
                    self.visualization_started = true;
                    // Reports may change with the new run.
                    self.reports.clear();
                }
            }
            Event::RunTriggered {
                generation,
                analysis_id,
                ..
            } => {
                if self.run.accept(generation) {
                    self.run.analysis_id = Some(analysis_id);
                }
            }
            Event::ProgressReceived { generation, event } => {
                if self.run.accept(generation) {
                    self.run.log.push(event);
                }
            }
            Event::AgentStatusChanged {
                generation,
                agent,
                status,
            } => {
                if self.run.accept(generation) {
                    let current = &mut self.run.agents[agent.index()];
                    if current.can_advance_to(status) {
                        *current = status;
                    }
                }
            }
            Event::RunFinished { generation, reason } => {
                if self.run.accept(generation) {
                    self.run.is_running = false;
                    self.run.finished = Some(reason);
                }
            }
            Event::RunFailed { generation, error } => {
                if self.run.accept(generation) {
                    self.run.is_running = false;
                    self.run.error = Some(error);
                }
            }
            Event::RunReset { generation } => {
                self.run.accept(generation);
            }
            Event::ReportLoaded { document } => {
                self.set_report(document.kind, Page::Loaded(document));
            }
            Event::ReportUnavailable { kind, error } => {
                self.set_report(kind, Page::Unavailable(error));
            }
            Event::GateBlocked { kind } => {
                self.set_report(kind, Page::Gated);
            }
            Event::MetricsLoaded { metrics } => self.metrics = Page::Loaded(metrics),
            Event::MetricsUnavailable { error } => self.metrics = Page::Unavailable(error),
            Event::HistoryLoaded { analyses } => self.history = Page::Loaded(analyses),
            Event::HistoryUnavailable { error } => self.history = Page::Unavailable(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_protocol::{Event, EventKind};

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Workflow.next(), Tab::Report(ReportKind::Stock));
        assert_eq!(Tab::Workflow.previous(), Tab::History);
        assert_eq!(Tab::History.next(), Tab::Workflow);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut state = DashboardState::new(false);
        state.apply(Event::RunStarted { generation: 1 });
        state.apply(Event::RunReset { generation: 2 });
        state.apply(Event::AgentStatusChanged {
            generation: 1,
            agent: AgentId::StockAnalyst,
            status: AgentStatus::Processing,
        });

        assert_eq!(state.run.generation, 2);
        assert_eq!(state.run.status(AgentId::StockAnalyst), AgentStatus::Pending);
        assert!(!state.run.is_running);
    }

    #[test]
    fn test_run_lifecycle() {
        let mut state = DashboardState::new(false);
        state.set_report(ReportKind::Stock, Page::Gated);

        state.apply(Event::RunStarted { generation: 3 });
        assert!(state.run.is_running);
        assert!(state.visualization_started);
        assert!(state.report(ReportKind::Stock).needs_load());

        state.apply(Event::ProgressReceived {
            generation: 3,
            event: ProgressEvent::new(EventKind::Info, Some("System"), "hi"),
        });
        for status in [AgentStatus::Completed, AgentStatus::Processing] {
            state.apply(Event::AgentStatusChanged {
                generation: 3,
                agent: AgentId::CompanyAnalyst,
                status,
            });
        }
        state.apply(Event::RunFinished {
            generation: 3,
            reason: FinishReason::Completed,
        });

        assert_eq!(state.run.log.len(), 1);
        assert_eq!(state.run.status(AgentId::CompanyAnalyst), AgentStatus::Completed);
        assert_eq!(state.run.progress_percent(), 33);
        assert!(!state.run.is_running);
        assert_eq!(state.run.finished, Some(FinishReason::Completed));
    }

    #[test]
    fn test_gate_and_report_pages() {
        let mut state = DashboardState::new(false);
        state.apply(Event::GateBlocked {
            kind: ReportKind::Compliance,
        });
        assert_eq!(*state.report(ReportKind::Compliance), Page::Gated);

        state.apply(Event::ReportUnavailable {
            kind: ReportKind::Stock,
            error: "data unavailable: stock_report.json".to_string(),
        });
        assert!(matches!(state.report(ReportKind::Stock), Page::Unavailable(_)));
        assert_eq!(*state.report(ReportKind::Investment), Page::NotLoaded);
    }
}
