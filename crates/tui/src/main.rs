//! Standalone entry point for the analysis-dashboard TUI.

use ad_core::config::loader::load_config;
use anyhow::Result;
use ad_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::current_dir()?;
    let config = load_config(&root).await?;
    run_app(config).await
}
