//! Run state without any I/O.
//!
//! [`RunState`] holds everything the dashboard knows about the current run.
//! The controller wraps it in a mutex and decides when to call which method;
//! all rules about what a mutation may do live here.

use super::choreography::is_choreography_trigger;
use ad_protocol::agent_models::{progress_percent, AgentId, AgentStatus};
use ad_protocol::event_models::{EventKind, ProgressEvent};
use serde::Serialize;

/// What recording a stream event means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Appended to the log, nothing else.
    Logged,
    /// The orchestration announcement: schedule the choreography.
    StartChoreography,
    /// The backend finished the run.
    Completed,
    /// The backend announced it is closing the stream.
    StreamClosed,
}

/// Immutable copy of the run state for renderers and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub generation: u64,
    pub is_running: bool,
    pub agents: [AgentStatus; 3],
    pub log: Vec<ProgressEvent>,
    pub progress_percent: u8,
    pub analysis_id: Option<String>,
    pub last_error: Option<String>,
}

impl RunSnapshot {
    pub fn status(&self, agent: AgentId) -> AgentStatus {
        self.agents[agent.index()]
    }
}

#[derive(Debug, Default)]
pub struct RunState {
    generation: u64,
    is_running: bool,
    agents: [AgentStatus; 3],
    log: Vec<ProgressEvent>,
    analysis_id: Option<String>,
    last_error: Option<String>,
    choreography_scheduled: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifies the current run. Bumped by every start and every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn status(&self, agent: AgentId) -> AgentStatus {
        self.agents[agent.index()]
    }

    pub fn log(&self) -> &[ProgressEvent] {
        &self.log
    }

    /// Start a new run, returning its generation.
    ///
    /// Returns `None` while a run is already in progress.
    pub fn begin(&mut self) -> Option<u64> {
        if self.is_running {
            return None;
        }
        self.clear();
        self.is_running = true;
        Some(self.generation)
    }

    /// Invalidate the current run and return to the idle state.
    pub fn reset(&mut self) -> u64 {
        self.clear();
        self.generation
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.is_running = false;
        self.agents = Default::default();
        self.log.clear();
        self.analysis_id = None;
        self.last_error = None;
        self.choreography_scheduled = false;
    }

    /// Move `agent` to `status` if that is a forward transition.
    pub fn advance(&mut self, agent: AgentId, status: AgentStatus) -> bool {
        let current = &mut self.agents[agent.index()];
        if current.can_advance_to(status) {
            *current = status;
            true
        } else {
            false
        }
    }

    pub fn set_analysis_id(&mut self, analysis_id: impl Into<String>) {
        self.analysis_id = Some(analysis_id.into());
    }

    /// Append `event` to the log and classify it.
    ///
    /// The choreography is requested at most once per run.
    pub fn record(&mut self, event: ProgressEvent) -> EventOutcome {
        let outcome = if is_choreography_trigger(&event) {
            if self.choreography_scheduled {
                EventOutcome::Logged
            } else {
                self.choreography_scheduled = true;
                EventOutcome::StartChoreography
            }
        } else {
            match event.kind {
                EventKind::Complete => EventOutcome::Completed,
                EventKind::End => EventOutcome::StreamClosed,
                _ => EventOutcome::Logged,
            }
        };
        self.log.push(event);
        outcome
    }

    /// Stop running. Returns whether the run was running.
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.is_running, false)
    }

    /// Stop running because of `error`.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        self.last_error = Some(error.into());
        self.finish()
    }

    /// Share of completed agents, rounded down.
    pub fn progress_percent(&self) -> u8 {
        progress_percent(&self.agents)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            generation: self.generation,
            is_running: self.is_running,
            agents: self.agents,
            log: self.log.clone(),
            progress_percent: self.progress_percent(),
            analysis_id: self.analysis_id.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
