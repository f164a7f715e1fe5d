//! Effective configuration after defaults and overrides are applied.

use std::path::PathBuf;

/// Backend used when neither the config file nor the environment names one.
pub const DEFAULT_API_BASE_URL: &str = "https://researchbackend.azurewebsites.net";

/// Environment variable overriding `api_base_url`.
pub const API_BASE_URL_ENV: &str = "ANALYSIS_API_BASE_URL";

/// Name of the per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".analysis-dashboard";

/// Unified application configuration.
///
/// # Example
///
/// ```rust,no_run
/// use ad_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("API: {:?}", config.api_base_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the backend, without trailing slash.
    ///
    /// `None` means the remote tier is disabled and every artifact comes
    /// from the fallback tier.
    pub api_base_url: Option<String>,

    /// On-disk replacement for the bundled artifacts.
    pub data_dir: Option<PathBuf>,

    /// Where the durable session flags and the TUI log are written.
    pub state_dir: PathBuf,
}

impl AppConfig {
    /// Configuration rooted at `root` with every default applied.
    pub fn defaults_for(root: &std::path::Path) -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            data_dir: None,
            state_dir: root.join(CONFIG_DIR_NAME).join("state"),
        }
    }
}
