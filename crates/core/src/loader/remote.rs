//! Remote tier: the backend's `fetchjson` endpoint.

use super::source::{JsonSource, SourceError};
use async_trait::async_trait;
use serde_json::Value;

/// Fetches `GET {base}/api/fetchjson?file=<name>`.
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    /// `base_url` must not end with a slash.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/fetchjson", self.base_url)
    }
}

#[async_trait]
impl JsonSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self, filename: &str) -> Result<Value, SourceError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("file", filename)])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::InvalidJson(e.to_string()))
    }
}
