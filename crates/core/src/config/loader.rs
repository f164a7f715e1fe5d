//! Configuration file loader for the `.analysis-dashboard/` directory.
//!
//! Only `config.toml` is read. A missing directory or file is not an error:
//! defaults are returned instead. Relative paths in the file are resolved
//! against the project root.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{AppConfig, API_BASE_URL_ENV, CONFIG_DIR_NAME, DEFAULT_API_BASE_URL};
use ad_protocol::config_models::GlobalConfig;
use std::path::{Path, PathBuf};

/// Loads the effective configuration for the project at `root`.
///
/// The `ANALYSIS_API_BASE_URL` environment variable, when set, replaces the
/// `api_base_url` from the file. Setting it to an empty string disables the
/// remote data tier.
///
/// # Errors
///
/// Returns `ConfigError` if `config.toml` exists but cannot be read or parsed,
/// or if a base URL is not an http(s) URL.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let env_base_url = std::env::var(API_BASE_URL_ENV).ok();
    load_config_with_env(root, env_base_url.as_deref())
}

/// Same as [`load_config`] with the environment value passed explicitly.
pub fn load_config_with_env(root: &Path, env_base_url: Option<&str>) -> ConfigResult<AppConfig> {
    let config_dir = root.join(CONFIG_DIR_NAME);
    let config_path = config_dir.join("config.toml");

    let global = load_global_config(&config_path)?;

    let api_base_url = resolve_api_base_url(global.api_base_url.as_deref(), env_base_url);
    if let Some(url) = &api_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let path = if env_base_url.is_some() {
                PathBuf::from(API_BASE_URL_ENV)
            } else {
                config_path
            };
            return Err(ConfigError::InvalidConfig {
                path,
                reason: format!("api_base_url must be an http(s) URL, got '{url}'"),
            });
        }
    }

    let defaults = AppConfig::defaults_for(root);

    Ok(AppConfig {
        api_base_url,
        data_dir: global.data_dir.map(|dir| resolve_path(root, dir)),
        state_dir: global
            .state_dir
            .map(|dir| resolve_path(root, dir))
            .unwrap_or(defaults.state_dir),
    })
}

/// Pick the effective base URL.
///
/// Precedence: environment, then file, then [`DEFAULT_API_BASE_URL`]. An
/// explicitly empty value from either source disables the remote tier.
/// Trailing slashes are removed so paths can be appended directly.
pub fn resolve_api_base_url(file_value: Option<&str>, env_value: Option<&str>) -> Option<String> {
    let chosen = env_value.or(file_value).unwrap_or(DEFAULT_API_BASE_URL);
    let trimmed = chosen.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Loads `config.toml`, returning defaults if it does not exist.
fn load_global_config(config_path: &Path) -> ConfigResult<GlobalConfig> {
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.to_path_buf(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source,
    })
}

fn resolve_path(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_missing_directory_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();

        let config = load_config_with_env(root, None).expect("Failed to load config");

        assert_eq!(config.api_base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
        assert!(config.data_dir.is_none());
        assert_eq!(config.state_dir, root.join(".analysis-dashboard/state"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let config_dir = root.join(".analysis-dashboard");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(
            config_dir.join("config.toml"),
            r#"
api_base_url = "http://localhost:8000/"
data_dir = "frontend/public/data"
state_dir = "/tmp/dashboard-state"
"#,
        )
        .expect("Failed to write config.toml");

        let config = load_config_with_env(root, None).expect("Failed to load config");

        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.data_dir, Some(root.join("frontend/public/data")));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/dashboard-state"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let config_dir = root.join(".analysis-dashboard");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::write(config_dir.join("config.toml"), "api_base_url = \"http://file:1\"")
            .expect("Failed to write config.toml");

        let config =
            load_config_with_env(root, Some("https://env.example")).expect("Failed to load config");
        assert_eq!(config.api_base_url.as_deref(), Some("https://env.example"));
    }

    #[test]
    fn test_empty_base_url_disables_remote() {
        assert_eq!(resolve_api_base_url(Some("http://file:1"), Some("")), None);
        assert_eq!(resolve_api_base_url(Some("  "), None), None);
        assert_eq!(
            resolve_api_base_url(None, None).as_deref(),
            Some(DEFAULT_API_BASE_URL)
        );
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let config_dir = root.join(".analysis-dashboard");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("config.toml"), "api_base_url = [invalid toml")
            .expect("Failed to write config.toml");

        let result = load_config_with_env(root, None);

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");

        let result = load_config_with_env(dir.path(), Some("ftp://nope"));

        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }
}
