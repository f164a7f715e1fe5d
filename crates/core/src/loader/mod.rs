//! Two-tier artifact loading.
//!
//! Report artifacts and workflow metrics are fetched from the backend's
//! `fetchjson` endpoint first and from the bundled copies second. Sources
//! are tried in order and the first success wins; failures are logged and
//! only surface once every source has missed.

pub mod bundled;
pub mod remote;
pub mod source;

pub use bundled::{DirectorySource, EmbeddedSource};
pub use remote::RemoteSource;
pub use source::{JsonSource, SourceError};

use crate::config::models::AppConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No source could supply the artifact.
    #[error("data unavailable: {filename}")]
    DataUnavailable {
        filename: String,
        /// `(source name, failure)` for each attempt, in order.
        attempts: Vec<(String, SourceError)>,
    },

    /// The artifact was found but does not have the expected shape.
    #[error("{filename} could not be decoded: {reason}")]
    Malformed { filename: String, reason: String },
}

impl LoadError {
    pub fn filename(&self) -> &str {
        match self {
            LoadError::DataUnavailable { filename, .. } | LoadError::Malformed { filename, .. } => {
                filename
            }
        }
    }
}

/// Ordered chain of [`JsonSource`]s.
#[derive(Clone)]
pub struct DataLoader {
    sources: Vec<Arc<dyn JsonSource>>,
}

impl DataLoader {
    pub fn new(sources: Vec<Arc<dyn JsonSource>>) -> Self {
        Self { sources }
    }

    /// Build the standard chain for `config`.
    ///
    /// The remote tier is left out entirely when no base URL is configured;
    /// the fallback tier is the configured `data_dir` or the embedded assets.
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        let mut sources: Vec<Arc<dyn JsonSource>> = Vec::with_capacity(2);
        if let Some(base_url) = &config.api_base_url {
            sources.push(Arc::new(RemoteSource::new(client, base_url.clone())));
        }
        match &config.data_dir {
            Some(dir) => sources.push(Arc::new(DirectorySource::new(dir.clone()))),
            None => sources.push(Arc::new(EmbeddedSource)),
        }
        Self::new(sources)
    }

    /// Names of the configured sources, in attempt order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetch `filename` from the first source that has it.
    ///
    /// # Errors
    ///
    /// `LoadError::DataUnavailable` when every source misses.
    pub async fn load_json(&self, filename: &str) -> Result<Value, LoadError> {
        let mut attempts = Vec::new();

        for source in &self.sources {
            tracing::debug!(source = source.name(), filename, "fetching artifact");
            match source.fetch(filename).await {
                Ok(value) => {
                    tracing::info!(source = source.name(), filename, "artifact loaded");
                    return Ok(value);
                }
                Err(error) => {
                    tracing::warn!(source = source.name(), filename, %error, "artifact fetch missed");
                    attempts.push((source.name().to_string(), error));
                }
            }
        }

        tracing::error!(filename, "artifact unavailable from every source");
        Err(LoadError::DataUnavailable {
            filename: filename.to_string(),
            attempts,
        })
    }

    /// Fetch `filename` and decode it into `T`.
    pub async fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T, LoadError> {
        let value = self.load_json(filename).await?;
        serde_json::from_value(value).map_err(|e| LoadError::Malformed {
            filename: filename.to_string(),
            reason: e.to_string(),
        })
    }
}
