//! Global configuration models for `.analysis-dashboard/config.toml`.
//!
//! Every key is optional; the core fills in defaults and applies the
//! environment override for the API base URL.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// Represents settings from `.analysis-dashboard/config.toml`.
///
/// # Example
///
/// ```toml
/// # .analysis-dashboard/config.toml
/// api_base_url = "http://localhost:8000"
/// data_dir = "frontend/public/data"
/// state_dir = ".analysis-dashboard/state"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Base URL of the analysis backend.
    ///
    /// An empty string disables the remote tier of the data loader.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Directory holding the fallback JSON artifacts.
    ///
    /// When unset, the artifacts bundled into the binary are used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the durable session flags and the TUI log file.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}
