//! `reqwest` implementation of [`AnalysisApi`].

use super::sse::SseParser;
use super::{AnalysisApi, ApiError, EventStream};
use ad_protocol::analysis_models::{AnalysesResponse, AnalysisSummary, HealthResponse, TriggerResponse};
use async_trait::async_trait;
use tokio_stream::StreamExt;

pub struct HttpAnalysisApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisApi {
    /// `base_url` must not end with a slash.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    async fn trigger(&self) -> Result<TriggerResponse, ApiError> {
        let url = self.url("/api/analyze");
        tracing::info!(%url, "triggering analysis");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ApiError::Trigger(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Trigger(format!("HTTP {status}")));
        }

        let body = response
            .json::<TriggerResponse>()
            .await
            .map_err(|e| ApiError::Trigger(format!("unusable response: {e}")))?;

        if body.analysis_id.is_empty() || body.stream_url.is_empty() {
            return Err(ApiError::Trigger(
                "response is missing analysis_id or stream_url".to_string(),
            ));
        }
        Ok(body)
    }

    async fn open_stream(&self, stream_url: &str) -> Result<EventStream, ApiError> {
        let url = self.url(stream_url);
        tracing::info!(%url, "opening progress stream");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| ApiError::Stream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Stream(format!("HTTP {status}")));
        }

        let mut bytes = Box::pin(response.bytes_stream());
        let stream = async_stream::stream! {
            let mut parser = SseParser::new();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        for event in parser.feed(&chunk) {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(ApiError::Stream(e.to_string()));
                        return;
                    }
                }
            }
            if let Some(event) = parser.finish() {
                yield Ok(event);
            }
        };

        Ok(Box::pin(stream))
    }

    async fn list_analyses(&self) -> Result<Vec<AnalysisSummary>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/analyses"))
            .send()
            .await
            .map_err(|e| ApiError::History(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::History(format!("HTTP {status}")));
        }

        let body = response
            .json::<AnalysesResponse>()
            .await
            .map_err(|e| ApiError::History(e.to_string()))?;
        Ok(body.analyses)
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| ApiError::Health(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Health(format!("HTTP {status}")));
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| ApiError::Health(e.to_string()))
    }
}
