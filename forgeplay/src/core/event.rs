//! Playback lifecycle events.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An event emitted while a playback run progresses.
///
/// Events are delivered to an [`EventSink`](crate::events::EventSink) and
/// are purely observational; nothing in the engine reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackEvent {
    /// The event type (e.g., "line.emitted", "playback.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl PlaybackEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns the payload as a JSON object, or `None` when empty.
    #[must_use]
    pub fn payload(&self) -> Option<serde_json::Value> {
        if self.data.is_empty() {
            return None;
        }
        let map: serde_json::Map<String, serde_json::Value> =
            self.data.clone().into_iter().collect();
        Some(serde_json::Value::Object(map))
    }

    fn for_run(event_type: &str, run_id: Uuid) -> Self {
        Self::new(event_type).add_data("run_id", serde_json::json!(run_id.to_string()))
    }

    /// Creates a "playback.started" event.
    #[must_use]
    pub fn started(run_id: Uuid, stage_count: usize, budget_ms: u64) -> Self {
        Self::for_run("playback.started", run_id)
            .add_data("stages", serde_json::json!(stage_count))
            .add_data("budget_ms", serde_json::json!(budget_ms))
    }

    /// Creates a "stage.started" event.
    #[must_use]
    pub fn stage_started(run_id: Uuid, index: usize, label: &str) -> Self {
        Self::for_run("stage.started", run_id)
            .add_data("stage", serde_json::json!(index))
            .add_data("label", serde_json::json!(label))
    }

    /// Creates a "line.emitted" event.
    #[must_use]
    pub fn line_emitted(run_id: Uuid, stage: usize, line: usize, text: &str) -> Self {
        Self::for_run("line.emitted", run_id)
            .add_data("stage", serde_json::json!(stage))
            .add_data("line", serde_json::json!(line))
            .add_data("text", serde_json::json!(text))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn stage_completed(run_id: Uuid, index: usize, label: &str) -> Self {
        Self::for_run("stage.completed", run_id)
            .add_data("stage", serde_json::json!(index))
            .add_data("label", serde_json::json!(label))
    }

    /// Creates a "playback.finished" event, raised when the last line is out.
    #[must_use]
    pub fn finished(run_id: Uuid, lines_emitted: usize) -> Self {
        Self::for_run("playback.finished", run_id)
            .add_data("lines_emitted", serde_json::json!(lines_emitted))
    }

    /// Creates a "playback.completed" event, raised when the host is notified.
    #[must_use]
    pub fn completed(run_id: Uuid, elapsed_ms: u64) -> Self {
        Self::for_run("playback.completed", run_id)
            .add_data("elapsed_ms", serde_json::json!(elapsed_ms))
    }

    /// Creates a "playback.dismissed" event, raised when the host closes a
    /// completed run.
    #[must_use]
    pub fn dismissed(run_id: Uuid) -> Self {
        Self::for_run("playback.dismissed", run_id)
    }

    /// Creates a "playback.cancelled" event.
    #[must_use]
    pub fn cancelled(run_id: Uuid, reason: &str, lines_discarded: usize) -> Self {
        Self::for_run("playback.cancelled", run_id)
            .add_data("reason", serde_json::json!(reason))
            .add_data("lines_discarded", serde_json::json!(lines_discarded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = PlaybackEvent::new("test.event");
        assert_eq!(event.event_type, "test.event");
        assert!(event.payload().is_none());
    }

    #[test]
    fn test_line_emitted() {
        let run_id = Uuid::new_v4();
        let event = PlaybackEvent::line_emitted(run_id, 1, 4, "> Loading verifier key...");
        assert_eq!(event.event_type, "line.emitted");
        assert_eq!(event.data.get("stage"), Some(&serde_json::json!(1)));
        assert_eq!(event.data.get("line"), Some(&serde_json::json!(4)));
        assert_eq!(
            event.data.get("run_id"),
            Some(&serde_json::json!(run_id.to_string()))
        );
    }

    #[test]
    fn test_payload_is_object() {
        let event = PlaybackEvent::cancelled(Uuid::nil(), "deactivated", 3);
        let payload = event.payload().unwrap();
        assert_eq!(payload["reason"], serde_json::json!("deactivated"));
        assert_eq!(payload["lines_discarded"], serde_json::json!(3));
    }

    #[test]
    fn test_event_serialization() {
        let event = PlaybackEvent::finished(Uuid::nil(), 40);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"playback.finished""#));

        let back: PlaybackEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type, "playback.finished");
    }
}
