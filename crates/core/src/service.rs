//! The core loop behind the dashboard.
//!
//! [`DashboardService`] receives [`Op`]s from a front end and answers with
//! [`Event`]s. It owns the run controller and is the only place report data
//! is requested, so the session gate is enforced here.

use crate::api::{AnalysisApi, ApiError, HttpAnalysisApi, OfflineApi};
use crate::config::models::AppConfig;
use crate::loader::{DataLoader, LoadError};
use crate::render::{compliance_document, investment_document, stock_document};
use crate::session::{GateViolation, SessionState};
use crate::workflow::RunController;
use ad_protocol::analysis_models::{AnalysisSummary, HealthResponse};
use ad_protocol::ipc::{Event, Op};
use ad_protocol::report_models::{
    ReportDocument, ReportKind, WorkflowMetrics, COMPANY_ANALYSIS_FILE, COMPLIANCE_FINDINGS_FILE,
    COMPLIANCE_RECOMMENDATION_FILE, STOCK_REPORT_FILE, WORKFLOW_METRICS_FILE,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Gated(#[from] GateViolation),

    #[error(transparent)]
    Unavailable(#[from] LoadError),
}

pub struct DashboardService {
    loader: DataLoader,
    api: Arc<dyn AnalysisApi>,
    session: Arc<SessionState>,
    controller: RunController,
    events_tx: UnboundedSender<Event>,
}

impl DashboardService {
    pub fn new(
        loader: DataLoader,
        api: Arc<dyn AnalysisApi>,
        session: Arc<SessionState>,
        events_tx: UnboundedSender<Event>,
    ) -> Self {
        let controller = RunController::new(Arc::clone(&api), Arc::clone(&session), events_tx.clone());
        Self {
            loader,
            api,
            session,
            controller,
            events_tx,
        }
    }

    /// Wire up the HTTP backend, the loader chain and the given session.
    pub fn from_config(
        config: &AppConfig,
        session: Arc<SessionState>,
        events_tx: UnboundedSender<Event>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let api: Arc<dyn AnalysisApi> = match &config.api_base_url {
            Some(base_url) => Arc::new(HttpAnalysisApi::new(client.clone(), base_url.clone())),
            None => {
                tracing::warn!("no API base URL configured, running offline");
                Arc::new(OfflineApi)
            }
        };
        let loader = DataLoader::from_config(config, client);

        Ok(Self::new(loader, api, session, events_tx))
    }

    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Load a report page.
    ///
    /// Nothing is fetched until a run has been started in this session.
    pub async fn load_report(&self, kind: ReportKind) -> Result<ReportDocument, ReportError> {
        if let Err(violation) = self.session.require_workflow_run(kind) {
            tracing::info!(%kind, "report blocked until a run is started");
            return Err(violation.into());
        }

        match kind {
            ReportKind::Stock => {
                let value = self.loader.load_json(STOCK_REPORT_FILE).await?;
                Ok(stock_document(&value))
            }
            ReportKind::Investment => {
                let value = self.loader.load_json(COMPANY_ANALYSIS_FILE).await?;
                Ok(investment_document(&value))
            }
            ReportKind::Compliance => self.load_compliance().await,
        }
    }

    /// The compliance page spans two artifacts. One missing artifact becomes
    /// an inline error on the page; both missing fails the page.
    async fn load_compliance(&self) -> Result<ReportDocument, ReportError> {
        let (findings, recommendation) = tokio::join!(
            self.loader.load_json(COMPLIANCE_FINDINGS_FILE),
            self.loader.load_json(COMPLIANCE_RECOMMENDATION_FILE),
        );

        match (findings, recommendation) {
            (Err(error), Err(_)) => Err(error.into()),
            (findings, recommendation) => {
                let errors = [&findings, &recommendation]
                    .into_iter()
                    .filter_map(|result| result.as_ref().err())
                    .map(ToString::to_string)
                    .collect();
                let mut document =
                    compliance_document(findings.as_ref().ok(), recommendation.as_ref().ok());
                document.errors = errors;
                Ok(document)
            }
        }
    }

    /// Headline metrics for the workflow page. Not gated.
    pub async fn load_metrics(&self) -> Result<WorkflowMetrics, LoadError> {
        self.loader.load(WORKFLOW_METRICS_FILE).await
    }

    /// Past runs, straight from the backend.
    pub async fn load_history(&self) -> Result<Vec<AnalysisSummary>, ApiError> {
        self.api.list_analyses().await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.api.health().await
    }

    /// Process one operation. Returns `false` once the loop should stop.
    pub async fn handle(&self, op: Op) -> bool {
        match op {
            Op::StartRun => {
                self.controller.start();
            }
            Op::ResetRun => self.controller.reset(),
            Op::LoadReport { kind } => {
                let event = match self.load_report(kind).await {
                    Ok(document) => Event::ReportLoaded { document },
                    Err(ReportError::Gated(violation)) => Event::GateBlocked {
                        kind: violation.kind,
                    },
                    Err(ReportError::Unavailable(error)) => Event::ReportUnavailable {
                        kind,
                        error: error.to_string(),
                    },
                };
                self.emit(event);
            }
            Op::LoadMetrics => {
                let event = match self.load_metrics().await {
                    Ok(metrics) => Event::MetricsLoaded { metrics },
                    Err(error) => Event::MetricsUnavailable {
                        error: error.to_string(),
                    },
                };
                self.emit(event);
            }
            Op::LoadHistory => {
                let event = match self.load_history().await {
                    Ok(analyses) => Event::HistoryLoaded { analyses },
                    Err(error) => {
                        tracing::warn!(%error, "history unavailable");
                        Event::HistoryUnavailable {
                            error: error.to_string(),
                        }
                    }
                };
                self.emit(event);
            }
            Op::Shutdown => return false,
        }
        true
    }

    /// Consume operations until `Shutdown` or until the sender is dropped.
    ///
    /// Run control is handled in order; loads run on their own tasks so a
    /// slow fetch never delays a start or reset.
    pub async fn run(self: Arc<Self>, mut ops_rx: UnboundedReceiver<Op>) {
        while let Some(op) = ops_rx.recv().await {
            match op {
                Op::StartRun | Op::ResetRun | Op::Shutdown => {
                    if !self.handle(op).await {
                        break;
                    }
                }
                load => {
                    let service = Arc::clone(&self);
                    tokio::spawn(async move {
                        service.handle(load).await;
                    });
                }
            }
        }
        tracing::debug!("dashboard service stopped");
    }

    fn emit(&self, event: Event) {
        if self.events_tx.send(event).is_err() {
            tracing::debug!("event receiver dropped");
        }
    }
}
