//! Fallback tier: artifacts shipped with the dashboard.
//!
//! By default the JSON files under the workspace `assets/data/` directory are
//! embedded into the binary with `rust-embed`, mirroring the `/data/<name>`
//! static assets of a served dashboard. A configured `data_dir` replaces them
//! with files read from disk.

use super::source::{is_plain_file_name, JsonSource, SourceError};
use async_trait::async_trait;
use rust_embed::RustEmbed;
use serde_json::Value;
use std::path::PathBuf;

/// Embedded fallback artifacts.
///
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../assets/data` = workspace `assets/data/`
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../assets/data"]
pub struct BundledAssets;

/// Names of all embedded artifacts.
pub fn bundled_artifacts() -> Vec<String> {
    BundledAssets::iter().map(|path| path.to_string()).collect()
}

fn parse(bytes: &[u8]) -> Result<Value, SourceError> {
    serde_json::from_slice(bytes).map_err(|e| SourceError::InvalidJson(e.to_string()))
}

/// Serves artifacts embedded in the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

#[async_trait]
impl JsonSource for EmbeddedSource {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn fetch(&self, filename: &str) -> Result<Value, SourceError> {
        if !is_plain_file_name(filename) {
            return Err(SourceError::NotFound);
        }
        let file = BundledAssets::get(filename).ok_or(SourceError::NotFound)?;
        parse(file.data.as_ref())
    }
}

/// Serves artifacts from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl JsonSource for DirectorySource {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn fetch(&self, filename: &str) -> Result<Value, SourceError> {
        if !is_plain_file_name(filename) {
            return Err(SourceError::NotFound);
        }
        let path = self.dir.join(filename);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound,
            _ => SourceError::Io(format!("{}: {e}", path.display())),
        })?;
        parse(&bytes)
    }
}
