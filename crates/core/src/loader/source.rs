//! The provider abstraction behind the data loader.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a single source could not supply an artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("artifact not found")]
    NotFound,
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("read failed: {0}")]
    Io(String),
}

/// A place JSON artifacts can be fetched from.
///
/// Sources are tried in order by the [`DataLoader`](super::DataLoader); a
/// source never retries on its own.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Short label used in diagnostics (`remote`, `bundled`).
    fn name(&self) -> &str;

    async fn fetch(&self, filename: &str) -> Result<Value, SourceError>;
}

/// Whether `filename` is a bare file name with no path components.
pub(crate) fn is_plain_file_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("stock_report.json"));
        assert!(!is_plain_file_name("../secrets.json"));
        assert!(!is_plain_file_name("data/stock_report.json"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
    }
}
