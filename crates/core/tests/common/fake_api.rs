//! Scripted backend for driving the run controller deterministically.

use ad_core::api::{AnalysisApi, ApiError, EventStream};
use ad_protocol::analysis_models::{AnalysisSummary, HealthResponse, TriggerResponse};
use ad_protocol::event_models::ProgressEvent;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One step of a scripted progress stream.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum StreamStep {
    Event(ProgressEvent),
    /// Sleep before the next step (tokio time, so it honours paused clocks).
    Wait(Duration),
    /// Fail the stream.
    Error(String),
    /// Keep the connection open forever.
    Hold,
}

/// Backend whose responses are fixed up front.
///
/// Each `open_stream` call consumes the next script; once the scripts run
/// out the stream closes immediately.
pub struct ScriptedApi {
    trigger: Result<TriggerResponse, ApiError>,
    scripts: Mutex<VecDeque<Vec<StreamStep>>>,
    history: Result<Vec<AnalysisSummary>, ApiError>,
    trigger_calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedApi {
    pub fn new(scripts: Vec<Vec<StreamStep>>) -> Self {
        Self {
            trigger: Ok(TriggerResponse {
                analysis_id: "ab12cd34".to_string(),
                stream_url: "/api/stream/ab12cd34".to_string(),
                status: Some("started".to_string()),
                message: None,
            }),
            scripts: Mutex::new(scripts.into()),
            history: Ok(Vec::new()),
            trigger_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_trigger(error: &str) -> Self {
        let mut api = Self::new(Vec::new());
        api.trigger = Err(ApiError::Trigger(error.to_string()));
        api
    }

    pub fn with_history(mut self, history: Result<Vec<AnalysisSummary>, ApiError>) -> Self {
        self.history = history;
        self
    }

    pub fn trigger_calls(&self) -> usize {
        self.trigger_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisApi for ScriptedApi {
    async fn trigger(&self) -> Result<TriggerResponse, ApiError> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        self.trigger.clone()
    }

    async fn open_stream(&self, _stream_url: &str) -> Result<EventStream, ApiError> {
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();

        let stream = async_stream::stream! {
            for step in script {
                match step {
                    StreamStep::Event(event) => yield Ok(event),
                    StreamStep::Wait(duration) => tokio::time::sleep(duration).await,
                    StreamStep::Error(message) => {
                        yield Err(ApiError::Stream(message));
                        return;
                    }
                    StreamStep::Hold => std::future::pending::<()>().await,
                }
            }
        };
        Ok(Box::pin(stream))
    }

    async fn list_analyses(&self) -> Result<Vec<AnalysisSummary>, ApiError> {
        self.history.clone()
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            timestamp: None,
            version: Some("1.0.0".to_string()),
            active_sessions: Some(0),
        })
    }
}
