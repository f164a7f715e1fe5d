//! Key/value backends for the session flags.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to create state directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode flags: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-valued storage for flags.
///
/// Writes complete before `write` returns.
pub trait FlagStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), SessionError>;
}

/// Durable storage: a JSON object persisted to a file.
///
/// A missing or unreadable file behaves like an empty store.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    guard: Mutex<()>,
}

impl FileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "ignoring unreadable flag file");
                BTreeMap::new()
            }
        }
    }
}

impl FlagStore for FileFlagStore {
    fn read(&self, key: &str) -> Option<String> {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        self.load().remove(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _lock = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, content).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Session-scoped storage: lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn read(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state/session.json");

        FileFlagStore::new(&path).write("visualizationStarted", "true").unwrap();
        FileFlagStore::new(&path).write("other", "1").unwrap();

        let reopened = FileFlagStore::new(&path);
        assert_eq!(reopened.read("visualizationStarted").as_deref(), Some("true"));
        assert_eq!(reopened.read("other").as_deref(), Some("1"));
        assert!(reopened.read("missing").is_none());
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileFlagStore::new(&path);
        assert!(store.read("visualizationStarted").is_none());
        store.write("visualizationStarted", "true").unwrap();
        assert_eq!(store.read("visualizationStarted").as_deref(), Some("true"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryFlagStore::new();
        assert!(store.read("hasWorkflowRun").is_none());
        store.write("hasWorkflowRun", "true").unwrap();
        assert_eq!(store.read("hasWorkflowRun").as_deref(), Some("true"));
    }
}
