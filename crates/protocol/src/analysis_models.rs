//! Request and response payloads of the analysis backend.
//!
//! - `POST /api/analyze` -> [`TriggerResponse`]
//! - `GET /api/analyses` -> [`AnalysesResponse`]
//! - `GET /health` -> [`HealthResponse`]

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of the trigger endpoint.
///
/// `stream_url` is relative to the API base URL.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TriggerResponse {
    pub analysis_id: String,
    pub stream_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One entry of the analysis history listing.
///
/// The backend stores documents with both lowercase and camelCase keys
/// (`workflowid` and `workflowId`), and older entries use snake_case
/// timestamps. Deserialization accepts every spelling and keeps the first
/// one present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "RawAnalysisSummary")]
pub struct AnalysisSummary {
    pub id: String,
    pub workflow_id: Option<String>,
    pub company_name: Option<String>,
    pub ticker: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub status: Option<String>,
    /// Per-agent status/output documents, passed through untouched.
    pub agents: Option<Value>,
}

#[derive(Deserialize)]
struct RawAnalysisSummary {
    #[serde(default)]
    id: String,
    #[serde(default)]
    workflowid: Option<String>,
    #[serde(default, rename = "workflowId")]
    workflow_id_camel: Option<String>,
    #[serde(default, rename = "workflow_id")]
    workflow_id_snake: Option<String>,
    #[serde(default, rename = "companyName")]
    company_name: Option<String>,
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<String>,
    #[serde(default, rename = "created_at")]
    created_at_snake: Option<String>,
    #[serde(default, rename = "updatedAt")]
    updated_at_camel: Option<String>,
    #[serde(default, rename = "updated_at")]
    updated_at_snake: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    agents: Option<Value>,
}

impl From<RawAnalysisSummary> for AnalysisSummary {
    fn from(raw: RawAnalysisSummary) -> Self {
        Self {
            id: raw.id,
            workflow_id: raw
                .workflowid
                .or(raw.workflow_id_camel)
                .or(raw.workflow_id_snake),
            company_name: raw.company_name,
            ticker: raw.ticker,
            created_at: raw.created_at_camel.or(raw.created_at_snake),
            updated_at: raw.updated_at_camel.or(raw.updated_at_snake),
            status: raw.status,
            agents: raw.agents,
        }
    }
}

impl AnalysisSummary {
    /// Parsed creation time, if the backend sent a recognizable timestamp.
    pub fn created_at_time(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Parsed last-update time.
    pub fn updated_at_time(&self) -> Option<DateTime<FixedOffset>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an ISO-8601 timestamp, treating values without an offset as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Response of the history endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AnalysesResponse {
    #[serde(default)]
    pub analyses: Vec<AnalysisSummary>,
}

/// Response of the health endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub active_sessions: Option<u64>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
