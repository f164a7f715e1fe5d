//! Session flags shared by the run controller and the report pages.
//!
//! Two independent booleans are tracked:
//! - `visualizationStarted` lives in durable storage and survives restarts.
//! - `hasWorkflowRun` lives in session storage and gates the report pages.
//!
//! Both are read once when the [`SessionState`] is built. Setters persist
//! before returning.

pub mod store;

pub use store::{FileFlagStore, FlagStore, MemoryFlagStore, SessionError};

use ad_protocol::report_models::ReportKind;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub const VISUALIZATION_STARTED_KEY: &str = "visualizationStarted";
pub const HAS_WORKFLOW_RUN_KEY: &str = "hasWorkflowRun";

/// File inside the state directory holding the durable flags.
pub const SESSION_FILE_NAME: &str = "session.json";

/// A report was requested before any run was started this session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} is unavailable until a workflow run has been started")]
pub struct GateViolation {
    pub kind: ReportKind,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    visualization_started: bool,
    has_workflow_run: bool,
}

/// The session flag store, injected wherever the flags are needed.
pub struct SessionState {
    durable: Arc<dyn FlagStore>,
    session: Arc<dyn FlagStore>,
    flags: Mutex<Flags>,
}

impl SessionState {
    pub fn new(durable: Arc<dyn FlagStore>, session: Arc<dyn FlagStore>) -> Self {
        let flags = Flags {
            visualization_started: read_flag(durable.as_ref(), VISUALIZATION_STARTED_KEY),
            has_workflow_run: read_flag(session.as_ref(), HAS_WORKFLOW_RUN_KEY),
        };
        tracing::debug!(
            visualization_started = flags.visualization_started,
            has_workflow_run = flags.has_workflow_run,
            "session flags loaded"
        );
        Self {
            durable,
            session,
            flags: Mutex::new(flags),
        }
    }

    /// Durable flags in `state_dir`, session flags in memory.
    pub fn open(state_dir: &Path) -> Self {
        Self::new(
            Arc::new(FileFlagStore::new(state_dir.join(SESSION_FILE_NAME))),
            Arc::new(MemoryFlagStore::new()),
        )
    }

    /// Both tiers in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryFlagStore::new()), Arc::new(MemoryFlagStore::new()))
    }

    fn flags(&self) -> std::sync::MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn visualization_started(&self) -> bool {
        self.flags().visualization_started
    }

    /// Persist `visualizationStarted`, then update the cached value.
    ///
    /// On a failed write the cached value is left untouched.
    pub fn set_visualization_started(&self, value: bool) -> Result<(), SessionError> {
        let mut flags = self.flags();
        self.durable.write(VISUALIZATION_STARTED_KEY, bool_str(value))?;
        flags.visualization_started = value;
        Ok(())
    }

    pub fn has_workflow_run(&self) -> bool {
        self.flags().has_workflow_run
    }

    /// Set `hasWorkflowRun`.
    ///
    /// The flag never goes back to false once set; such a request is ignored.
    pub fn set_has_workflow_run(&self, value: bool) -> Result<(), SessionError> {
        let mut flags = self.flags();
        if flags.has_workflow_run && !value {
            tracing::debug!("ignoring attempt to clear hasWorkflowRun");
            return Ok(());
        }
        self.session.write(HAS_WORKFLOW_RUN_KEY, bool_str(value))?;
        flags.has_workflow_run = value;
        Ok(())
    }

    /// Gate for report content.
    pub fn require_workflow_run(&self, kind: ReportKind) -> Result<(), GateViolation> {
        if self.has_workflow_run() {
            Ok(())
        } else {
            Err(GateViolation { kind })
        }
    }
}

fn read_flag(store: &dyn FlagStore, key: &str) -> bool {
    store
        .read(key)
        .and_then(|raw| raw.trim().parse::<bool>().ok())
        .unwrap_or(false)
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
