//! The fixed-delay animation cascade.
//!
//! The backend does not report per-agent completion in a form the dashboard
//! can rely on, so once the orchestrator announces the group discussion the
//! three agent cards are animated on a fixed timeline measured from that
//! announcement.

use ad_protocol::agent_models::{AgentId, AgentStatus};
use ad_protocol::event_models::{EventKind, ProgressEvent};
use std::time::Duration;

/// Channel name the orchestrator uses for its own announcements.
pub const ORCHESTRATION_CHANNEL: &str = "GroupChat";

/// Substring of the announcement that starts the cascade.
pub const DISCUSSION_MARKER: &str = "Starting multi-agent discussion";

/// Transitions applied together at `delay` after the announcement.
#[derive(Debug, Clone, Copy)]
pub struct ChoreographyStep {
    pub delay: Duration,
    pub transitions: &'static [(AgentId, AgentStatus)],
}

pub const CHOREOGRAPHY: [ChoreographyStep; 4] = [
    ChoreographyStep {
        delay: Duration::from_secs(5),
        transitions: &[(AgentId::StockAnalyst, AgentStatus::Processing)],
    },
    ChoreographyStep {
        delay: Duration::from_secs(20),
        transitions: &[
            (AgentId::StockAnalyst, AgentStatus::Completed),
            (AgentId::CompanyAnalyst, AgentStatus::Processing),
        ],
    },
    ChoreographyStep {
        delay: Duration::from_secs(35),
        transitions: &[
            (AgentId::CompanyAnalyst, AgentStatus::Completed),
            (AgentId::ComplianceEvaluator, AgentStatus::Processing),
        ],
    },
    ChoreographyStep {
        delay: Duration::from_secs(50),
        transitions: &[(AgentId::ComplianceEvaluator, AgentStatus::Completed)],
    },
];

/// Time from the announcement until the last transition.
pub fn total_duration() -> Duration {
    CHOREOGRAPHY
        .iter()
        .map(|step| step.delay)
        .max()
        .unwrap_or_default()
}

/// Whether `event` is the orchestrator's discussion announcement.
pub fn is_choreography_trigger(event: &ProgressEvent) -> bool {
    event.kind == EventKind::AgentRunning
        && event.agent.as_deref() == Some(ORCHESTRATION_CHANNEL)
        && event.message.contains(DISCUSSION_MARKER)
}
