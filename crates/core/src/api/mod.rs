//! Client side of the analysis backend.
//!
//! The run controller and the dashboard service only see the
//! [`AnalysisApi`] trait, so tests can drive them with scripted fakes.

pub mod http;
pub mod sse;

pub use http::HttpAnalysisApi;
pub use sse::SseParser;

use ad_protocol::analysis_models::{AnalysisSummary, HealthResponse, TriggerResponse};
use ad_protocol::event_models::ProgressEvent;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Failures talking to the backend. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The trigger request failed or returned an unusable payload.
    #[error("failed to start analysis: {0}")]
    Trigger(String),

    /// The progress stream could not be opened or broke mid-run.
    #[error("progress stream error: {0}")]
    Stream(String),

    #[error("failed to list analyses: {0}")]
    History(String),

    #[error("health check failed: {0}")]
    Health(String),
}

/// Ordered progress events of one run.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ProgressEvent, ApiError>> + Send>>;

#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /api/analyze`
    async fn trigger(&self) -> Result<TriggerResponse, ApiError>;

    /// `GET {stream_url}`; the stream ends when the server closes it.
    async fn open_stream(&self, stream_url: &str) -> Result<EventStream, ApiError>;

    /// `GET /api/analyses`
    async fn list_analyses(&self) -> Result<Vec<AnalysisSummary>, ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// Stand-in used when no API base URL is configured.
///
/// Every call fails immediately, so runs and history report an error while
/// the data loader keeps serving the bundled artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineApi;

const OFFLINE: &str = "no API base URL configured";

#[async_trait]
impl AnalysisApi for OfflineApi {
    async fn trigger(&self) -> Result<TriggerResponse, ApiError> {
        Err(ApiError::Trigger(OFFLINE.to_string()))
    }

    async fn open_stream(&self, _stream_url: &str) -> Result<EventStream, ApiError> {
        Err(ApiError::Stream(OFFLINE.to_string()))
    }

    async fn list_analyses(&self) -> Result<Vec<AnalysisSummary>, ApiError> {
        Err(ApiError::History(OFFLINE.to_string()))
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        Err(ApiError::Health(OFFLINE.to_string()))
    }
}
