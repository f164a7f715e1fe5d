//! Sample events and artifacts.

use ad_protocol::event_models::{EventKind, ProgressEvent};
use serde_json::{json, Value};

/// The orchestrator's announcement that starts the choreography.
#[allow(dead_code)]
pub fn discussion_started() -> ProgressEvent {
    ProgressEvent::new(
        EventKind::AgentRunning,
        Some("GroupChat"),
        "⏳ Starting multi-agent discussion (round-robin)...",
    )
    .with_timestamp("14:02:11")
}

#[allow(dead_code)]
pub fn info(message: &str) -> ProgressEvent {
    ProgressEvent::new(EventKind::Info, Some("System"), message).with_timestamp("14:02:00")
}

#[allow(dead_code)]
pub fn complete() -> ProgressEvent {
    ProgressEvent::new(EventKind::Complete, Some("System"), "✅ Analysis complete!")
}

#[allow(dead_code)]
pub fn end() -> ProgressEvent {
    ProgressEvent::new(EventKind::End, None, "Stream closed")
}

#[allow(dead_code)]
pub fn stock_report() -> Value {
    json!({
        "report_metadata": {"symbol": "GMRAIRPORT.NS", "company_name": "GMR Airports Ltd"},
        "sections": [
            {"id": "executive_summary", "name": "Executive Summary",
             "summary": "Up 7.61%", "image": "executive_summary.png"}
        ]
    })
}

#[allow(dead_code)]
pub fn compliance_recommendation() -> Value {
    json!({"section_4_final_recommendation": "HOLD within the satellite allocation."})
}
