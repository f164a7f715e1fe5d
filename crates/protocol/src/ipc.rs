//! Inter-task communication protocol.
//!
//! The TUI and the core talk over channels using an Operation/Event pattern:
//! - `Op`: Commands sent from the TUI to the core
//! - `Event`: State changes sent from the core to the TUI
//!
//! Both enums use tagged serialization:
//! ```json
//! {
//!   "type": "agentStatusChanged",
//!   "payload": { "agent": "stock_analyst", "status": "processing" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::agent_models::{AgentId, AgentStatus};
use crate::analysis_models::AnalysisSummary;
use crate::event_models::ProgressEvent;
use crate::report_models::{ReportDocument, ReportKind, WorkflowMetrics};

/// Operations sent from the UI to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Trigger a new analysis run. Ignored while a run is in progress.
    StartRun,

    /// Cancel the current run (if any) and restore all agents to pending.
    ResetRun,

    /// Load a report page. Blocked until a run has been started this session.
    LoadReport { kind: ReportKind },

    /// Load the headline metrics shown on the workflow page.
    LoadMetrics,

    /// Load the analysis history listing.
    LoadHistory,

    /// Shut down the core loop.
    Shutdown,
}

/// Why a run stopped without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishReason {
    /// The backend sent a `complete` event.
    Completed,
    /// The backend closed the stream without a `complete` event.
    StreamClosed,
}

/// Events sent from the core to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A run was accepted locally; agents are reset to pending.
    RunStarted { generation: u64 },

    /// The backend accepted the trigger request.
    RunTriggered {
        generation: u64,
        analysis_id: String,
        stream_url: String,
    },

    /// A progress event arrived on the stream.
    ProgressReceived { generation: u64, event: ProgressEvent },

    /// An agent card moved forward.
    AgentStatusChanged {
        generation: u64,
        agent: AgentId,
        status: AgentStatus,
    },

    /// The run is no longer running.
    RunFinished { generation: u64, reason: FinishReason },

    /// The trigger request or the stream failed.
    RunFailed { generation: u64, error: String },

    /// The run state was cleared.
    RunReset { generation: u64 },

    ReportLoaded { document: ReportDocument },

    ReportUnavailable { kind: ReportKind, error: String },

    /// A report was requested before any run was started this session.
    GateBlocked { kind: ReportKind },

    MetricsLoaded { metrics: WorkflowMetrics },

    MetricsUnavailable { error: String },

    HistoryLoaded { analyses: Vec<AnalysisSummary> },

    HistoryUnavailable { error: String },
}
