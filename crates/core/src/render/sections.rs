//! Assembly of report pages from the raw artifacts.

use ad_protocol::report_models::{ReportDocument, ReportKind, ReportSection};
use serde_json::Value;

/// Compliance sections in page order: `(artifact key, title)`.
pub const COMPLIANCE_FINDING_SECTIONS: [(&str, &str); 3] = [
    ("section_1_policy_rules", "Policy Rules"),
    ("section_2_trading_classification", "Trading Classification"),
    ("section_3_exceptional_events", "Exceptional Events"),
];

pub const COMPLIANCE_RECOMMENDATION_SECTION: (&str, &str) =
    ("section_4_final_recommendation", "Final Recommendation");

fn document(kind: ReportKind, sections: Vec<ReportSection>) -> ReportDocument {
    ReportDocument {
        kind,
        title: kind.title().to_string(),
        sections,
        errors: Vec::new(),
    }
}

fn section_array(value: &Value) -> Vec<ReportSection> {
    value
        .get("sections")
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(ReportSection::from).collect())
        .unwrap_or_default()
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `stock_report.json`: one section per dashboard panel.
pub fn stock_document(value: &Value) -> ReportDocument {
    document(ReportKind::Stock, section_array(value))
}

/// `company_analysis_output.json`.
///
/// The recommendation leads the page, followed by the analysis sections and
/// the strength/challenge lists when the artifact carries them.
pub fn investment_document(value: &Value) -> ReportDocument {
    let mut sections = Vec::new();

    if let Some(recommendation) = value.get("recommendation").and_then(Value::as_str) {
        sections.push(ReportSection::text(
            "recommendation",
            "Recommendation",
            recommendation,
        ));
    }

    sections.extend(section_array(value));

    for (key, title) in [("key_strengths", "Key Strengths"), ("key_challenges", "Key Challenges")] {
        let points = string_list(value, key);
        if !points.is_empty() {
            let mut section = ReportSection::text(key, title, "");
            section.points = points;
            sections.push(section);
        }
    }

    document(ReportKind::Investment, sections)
}

/// Sections found in `compliance_findings.json`.
pub fn compliance_finding_sections(findings: &Value) -> Vec<ReportSection> {
    COMPLIANCE_FINDING_SECTIONS
        .iter()
        .filter_map(|(key, title)| compliance_section(findings, key, title))
        .collect()
}

/// The closing section from `compliance_recommendation.json`.
pub fn compliance_recommendation_section(recommendation: &Value) -> Option<ReportSection> {
    let (key, title) = COMPLIANCE_RECOMMENDATION_SECTION;
    compliance_section(recommendation, key, title)
}

/// Compliance page from whichever artifacts loaded.
pub fn compliance_document(
    findings: Option<&Value>,
    recommendation: Option<&Value>,
) -> ReportDocument {
    let mut sections = findings.map(compliance_finding_sections).unwrap_or_default();
    sections.extend(recommendation.and_then(compliance_recommendation_section));
    document(ReportKind::Compliance, sections)
}

/// Older artifacts hold a nested object instead of prose; it is shown as
/// pretty-printed JSON.
fn compliance_section(value: &Value, key: &str, title: &str) -> Option<ReportSection> {
    let body = match value.get(key)? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    Some(ReportSection::text(key, title, body))
}
