//! Progress events received from the analysis event stream.
//!
//! Each server-sent message carries one JSON object:
//!
//! ```json
//! {
//!   "type": "agent_running",
//!   "timestamp": "14:02:11",
//!   "agent": "GroupChat",
//!   "message": "⏳ Starting multi-agent discussion (round-robin)...",
//!   "data": {}
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The `type` field of a progress event.
///
/// Known types get their own variant; anything else is preserved verbatim in
/// [`EventKind::Other`] so the event log never loses information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Step,
    Phase,
    AgentCreated,
    AgentRunning,
    AgentCompleted,
    AgentError,
    AgentTurn,
    /// The run finished on the backend.
    Complete,
    /// The backend reported a failure inside the run.
    Error,
    /// Sentinel sent right before the backend closes the stream.
    End,
    Other(String),
}

impl EventKind {
    /// The wire representation of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Info => "info",
            EventKind::Step => "step",
            EventKind::Phase => "phase",
            EventKind::AgentCreated => "agent_created",
            EventKind::AgentRunning => "agent_running",
            EventKind::AgentCompleted => "agent_completed",
            EventKind::AgentError => "agent_error",
            EventKind::AgentTurn => "agent_turn",
            EventKind::Complete => "complete",
            EventKind::Error => "error",
            EventKind::End => "end",
            EventKind::Other(other) => other,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "info" => EventKind::Info,
            "step" => EventKind::Step,
            "phase" => EventKind::Phase,
            "agent_created" => EventKind::AgentCreated,
            "agent_running" => EventKind::AgentRunning,
            "agent_completed" => EventKind::AgentCompleted,
            "agent_error" => EventKind::AgentError,
            "agent_turn" => EventKind::AgentTurn,
            "complete" => EventKind::Complete,
            "error" => EventKind::Error,
            "end" => EventKind::End,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EventKind::from(s.as_str()))
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single message from the progress stream.
///
/// Events are appended to the run's log in arrival order and never mutated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Wall-clock time formatted by the backend (`HH:MM:SS`).
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub message: String,

    /// Channel that produced the event (an agent name, `System`, `GroupChat`...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Free-form payload attached by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProgressEvent {
    /// Build an event without payload.
    pub fn new(kind: EventKind, agent: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp: String::new(),
            message: message.into(),
            agent: agent.map(str::to_string),
            data: None,
        }
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// One-line rendering used by the event log views.
    pub fn log_line(&self) -> String {
        match &self.agent {
            Some(agent) => format!("[{}] {}: {}", self.timestamp, agent, self.message),
            None => format!("[{}] {}", self.timestamp, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_is_preserved() {
        let event: ProgressEvent =
            serde_json::from_str(r#"{"type":"heartbeat","timestamp":"10:00:00","message":"ping"}"#)
                .unwrap();
        assert_eq!(event.kind, EventKind::Other("heartbeat".to_string()));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "heartbeat");
    }

    #[test]
    fn test_end_sentinel_without_timestamp() {
        let event: ProgressEvent =
            serde_json::from_str(r#"{"type": "end", "message": "Stream closed"}"#).unwrap();
        assert_eq!(event.kind, EventKind::End);
        assert!(event.timestamp.is_empty());
        assert!(event.agent.is_none());
    }

    #[test]
    fn test_log_line_includes_agent() {
        let event = ProgressEvent::new(EventKind::Info, Some("System"), "hello")
            .with_timestamp("12:00:01");
        assert_eq!(event.log_line(), "[12:00:01] System: hello");
    }
}
