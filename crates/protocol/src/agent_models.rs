//! Agent identity and status models.
//!
//! The dashboard visualizes three fixed analysis stages. Each one carries an
//! [`AgentStatus`] that only ever moves forward during a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three analysis stages whose progress is visualized.
///
/// The declaration order is the order in which the stages are animated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Technical analysis of price, volume and volatility.
    StockAnalyst,

    /// Fundamental analysis of the company financials.
    ///
    /// Serialized as `investment_analyst` to match the backend artifacts.
    #[serde(rename = "investment_analyst", alias = "company_analyst")]
    CompanyAnalyst,

    /// Regulatory and valuation-policy review.
    ComplianceEvaluator,
}

impl AgentId {
    /// All agents in animation order.
    pub const ALL: [AgentId; 3] = [
        AgentId::StockAnalyst,
        AgentId::CompanyAnalyst,
        AgentId::ComplianceEvaluator,
    ];

    /// Human-readable name shown on the agent cards.
    pub fn display_name(self) -> &'static str {
        match self {
            AgentId::StockAnalyst => "Stock Analyst",
            AgentId::CompanyAnalyst => "Company Analyst",
            AgentId::ComplianceEvaluator => "Compliance Evaluator",
        }
    }

    /// Zero-based position in [`AgentId::ALL`].
    pub fn index(self) -> usize {
        match self {
            AgentId::StockAnalyst => 0,
            AgentId::CompanyAnalyst => 1,
            AgentId::ComplianceEvaluator => 2,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Animated status of a single agent.
///
/// The status progresses strictly forward within a run:
/// Pending -> Processing -> Completed
///
/// The derived `Ord` follows that progression, so a transition is valid
/// exactly when the target compares greater than the current status.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Waiting for the run to reach this agent.
    #[default]
    Pending,

    /// The agent is being animated as working.
    Processing,

    /// Terminal for the run.
    Completed,
}

impl AgentStatus {
    /// Whether moving from `self` to `next` respects monotonicity.
    pub fn can_advance_to(self, next: AgentStatus) -> bool {
        next > self
    }
}

/// Share of completed agents in percent, rounded down. Empty input is 0.
pub fn progress_percent(statuses: &[AgentStatus]) -> u8 {
    if statuses.is_empty() {
        return 0;
    }
    let completed = statuses
        .iter()
        .filter(|status| **status == AgentStatus::Completed)
        .count();
    // At most 100, so the conversion cannot fail.
    u8::try_from(completed * 100 / statuses.len()).unwrap_or(100)
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentStatus::Pending => "pending",
            AgentStatus::Processing => "processing",
            AgentStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}
