//! Report artifacts and their rendered form.
//!
//! Reports are pre-computed JSON documents produced by the analysis pipeline.
//! The dashboard only reads them; nothing here is ever written back.

use crate::agent_models::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three report pages of the dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    Stock,
    Investment,
    Compliance,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Stock,
        ReportKind::Investment,
        ReportKind::Compliance,
    ];

    /// Page title.
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Stock => "Stock Analysis",
            ReportKind::Investment => "Investment Analysis",
            ReportKind::Compliance => "Compliance Review",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub const STOCK_REPORT_FILE: &str = "stock_report.json";
pub const COMPANY_ANALYSIS_FILE: &str = "company_analysis_output.json";
pub const COMPLIANCE_FINDINGS_FILE: &str = "compliance_findings.json";
pub const COMPLIANCE_RECOMMENDATION_FILE: &str = "compliance_recommendation.json";
pub const WORKFLOW_METRICS_FILE: &str = "workflow_metrics.json";

/// A titled block of report text, optionally with bullet points and a chart.
///
/// Artifacts disagree on key names: stock sections use `name`/`summary`,
/// investment sections use `title`/`analysis`. Both are accepted. The
/// original object is kept in `raw` for views that need backend-specific
/// fields (`dashboard`, `size`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "Value")]
pub struct ReportSection {
    pub id: String,
    pub title: String,
    pub body: String,
    pub points: Vec<String>,
    /// File name of the chart image, relative to `/images/`.
    pub image: Option<String>,
    pub raw: Value,
}

impl ReportSection {
    /// Build a text-only section.
    pub fn text(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let id = id.into();
        let title = title.into();
        let body = body.into();
        let raw = serde_json::json!({ "id": id, "name": title, "summary": body });
        Self {
            id,
            title,
            body,
            points: Vec::new(),
            image: None,
            raw,
        }
    }

    /// Served path of the section image (`/images/<filename>`).
    ///
    /// Artifacts sometimes carry a directory prefix (`images/p1.png`,
    /// `frontend/images/p1.png`); only the file name is kept.
    pub fn image_path(&self) -> Option<String> {
        let image = self.image.as_deref()?.trim();
        let file_name = image.rsplit(['/', '\\']).next().unwrap_or(image);
        if file_name.is_empty() {
            return None;
        }
        Some(format!("/images/{file_name}"))
    }
}

impl From<Value> for ReportSection {
    fn from(raw: Value) -> Self {
        let text_field = |keys: &[&str]| -> String {
            keys.iter()
                .find_map(|key| raw.get(*key).and_then(Value::as_str))
                .unwrap_or_default()
                .to_string()
        };

        let id = match raw.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let points = raw
            .get("points")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let image = raw
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        Self {
            id,
            title: text_field(&["name", "title"]),
            body: text_field(&["summary", "analysis", "content", "body"]),
            points,
            image,
            raw,
        }
    }
}

/// A report page ready to be rendered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: String,
    pub sections: Vec<ReportSection>,
    /// Inline errors for artifacts of this report that could not be loaded.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// One renderable piece of report text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentPart {
    /// Prose, verbatim including line breaks.
    Text { content: String },

    /// A markdown table split out of the prose.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl ContentPart {
    pub fn text(content: impl Into<String>) -> Self {
        ContentPart::Text {
            content: content.into(),
        }
    }
}

/// Contents of `workflow_metrics.json`: headline numbers per agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WorkflowMetrics {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub agents: Vec<AgentMetrics>,
}

impl WorkflowMetrics {
    /// Metrics block for a given agent, if present.
    pub fn for_agent(&self, agent: AgentId) -> Option<&AgentMetrics> {
        self.agents.iter().find(|m| m.agent_id() == Some(agent))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentMetrics {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub output: String,
}

impl AgentMetrics {
    pub fn agent_id(&self) -> Option<AgentId> {
        serde_json::from_value(Value::String(self.id.clone())).ok()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    /// Styling hint from the artifact; ignored by the terminal views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_accepts_stock_shape() {
        let section: ReportSection = serde_json::from_value(json!({
            "id": "panel_p1_price_trend",
            "name": "Price Trend",
            "summary": "Closed higher.",
            "image": "p1_price_trend.png",
            "dashboard": "P1",
            "size": "large"
        }))
        .unwrap();

        assert_eq!(section.id, "panel_p1_price_trend");
        assert_eq!(section.title, "Price Trend");
        assert_eq!(section.body, "Closed higher.");
        assert_eq!(section.image_path().as_deref(), Some("/images/p1_price_trend.png"));
        assert_eq!(section.raw["dashboard"], "P1");
    }

    #[test]
    fn test_section_accepts_investment_shape() {
        let section: ReportSection = serde_json::from_value(json!({
            "id": 2,
            "title": "Balance Sheet",
            "analysis": "Debt rose.",
            "points": ["Net debt up", 7, "Coverage below 1x"],
            "image": null
        }))
        .unwrap();

        assert_eq!(section.id, "2");
        assert_eq!(section.title, "Balance Sheet");
        assert_eq!(section.body, "Debt rose.");
        assert_eq!(section.points, vec!["Net debt up", "Coverage below 1x"]);
        assert!(section.image.is_none());
        assert!(section.image_path().is_none());
    }

    #[test]
    fn test_image_path_strips_directories() {
        let mut section = ReportSection::text("s", "S", "");
        section.image = Some("frontend/images/p4_volatility.png".to_string());
        assert_eq!(section.image_path().as_deref(), Some("/images/p4_volatility.png"));
    }

    #[test]
    fn test_metrics_lookup_by_agent() {
        let metrics: WorkflowMetrics = serde_json::from_value(json!({
            "company_name": "GMR Airports Ltd",
            "agents": [
                {"id": "investment_analyst", "name": "Company Analyst",
                 "metrics": [{"label": "EV/EBITDA", "value": "120x"}]}
            ]
        }))
        .unwrap();

        let company = metrics.for_agent(AgentId::CompanyAnalyst).unwrap();
        assert_eq!(company.metrics[0].value, "120x");
        assert!(metrics.for_agent(AgentId::StockAnalyst).is_none());
    }
}
