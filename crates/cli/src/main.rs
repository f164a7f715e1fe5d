//! `dashboard`: the analysis-dashboard command line.
//!
//! Without a subcommand the TUI is launched. The subcommands run the same
//! core headlessly, which is handy for scripting and for checking a backend.

mod commands;
mod logging;

use ad_core::config::loader::load_config;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dashboard", version, about = "Multi-agent analysis dashboard")]
struct Cli {
    /// Project root holding `.analysis-dashboard/config.toml`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Debug-level logging for the dashboard crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the analysis workflow without the TUI, printing progress.
    Run {
        /// Print this report once the run has settled.
        #[arg(long, value_enum)]
        report: Option<ReportArg>,
    },
    /// Load one data artifact through the loader chain and print it.
    Fetch {
        /// Artifact file name, e.g. `stock_report.json`.
        file: String,
    },
    /// Split a local markdown file into text and table parts.
    Render {
        path: PathBuf,
        /// Print the parts as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List past analyses known to the backend.
    History,
    /// Check that the backend is up.
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    Stock,
    Investment,
    Compliance,
}

impl From<ReportArg> for ad_protocol::ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Stock => ad_protocol::ReportKind::Stock,
            ReportArg::Investment => ad_protocol::ReportKind::Investment,
            ReportArg::Compliance => ad_protocol::ReportKind::Compliance,
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = load_config(&root).await?;

    let Some(command) = cli.command else {
        logging::init_file(&config.state_dir, cli.verbose)?;
        return ad_tui::run_app(config).await.map_err(|e| eyre!(e));
    };

    logging::init_stderr(cli.verbose);
    match command {
        Command::Run { report } => commands::run(&config, report.map(Into::into)).await,
        Command::Fetch { file } => commands::fetch(&config, &file).await,
        Command::Render { path, json } => commands::render(&path, json).await,
        Command::History => commands::history(&config).await,
        Command::Health => commands::health(&config).await,
    }
}
