//! # ad-tui
//!
//! Terminal user interface for analysis-dashboard.
//!
//! The TUI talks to [`ad_core::DashboardService`] over channels using the
//! `Op` and `Event` protocol from `ad-protocol`; it never touches the
//! network or the session store directly.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod state;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use ad_core::config::models::AppConfig;
use ad_core::session::SessionState;
use ad_core::DashboardService;
use ad_protocol::Op;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// Start the core service and run the TUI until the user quits.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let session = Arc::new(SessionState::open(&config.state_dir));
    let visualization_started = session.visualization_started();

    let (op_tx, op_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();
    let service = Arc::new(DashboardService::from_config(&config, session, event_tx)?);
    let core = tokio::spawn(Arc::clone(&service).run(op_rx));

    let mut app = App::new(op_tx.clone(), event_rx, visualization_started);
    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    tui.restore()?;

    let _ = op_tx.send(Op::Shutdown);
    if let Err(error) = core.await {
        tracing::warn!(%error, "core task ended abnormally");
    }
    // Stop timers and the stream of a run still in flight.
    service.controller().reset();

    result
}
