//! Log subscriber setup.
//!
//! `RUST_LOG` wins when set. Headless commands log to stderr so stdout stays
//! clean for command output; the TUI logs to a file because anything written
//! to the terminal would corrupt the alternate screen.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_FILTER: &str = "ad_core=info,ad_tui=info,warn";

/// File name of the TUI log inside the state directory.
pub const LOG_FILE_NAME: &str = "dashboard.log";

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ad_core=debug,ad_tui=debug,info")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

/// Log to stderr.
pub fn init_stderr(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .try_init()
        .ok();
}

/// Append logs to `<state_dir>/dashboard.log`.
pub fn init_file(state_dir: &Path, verbose: bool) -> std::io::Result<()> {
    std::fs::create_dir_all(state_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(state_dir.join(LOG_FILE_NAME))?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .try_init()
        .ok();
    Ok(())
}
