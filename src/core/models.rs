use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level field carrying the phase marker on re-invocation payloads.
pub const PHASE_FIELD: &str = "eventType";

/// Which half of the two-phase dispatch an invocation belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Initial webhook delivery from Slack.
    #[default]
    Request,
    /// Deferred invocation that produces and sends the reply.
    Answer,
}

impl Phase {
    /// Reads the marker from a payload. Absent or unknown values mean `Request`.
    #[must_use]
    pub fn of(payload: &Value) -> Self {
        payload
            .get(PHASE_FIELD)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Returns a copy of `payload` tagged with this phase.
    #[must_use]
    pub fn mark(self, payload: &Value) -> Value {
        let mut marked = payload.clone();
        if let Some(obj) = marked.as_object_mut() {
            obj.insert(
                PHASE_FIELD.to_string(),
                serde_json::to_value(self).unwrap_or(Value::Null),
            );
        }
        marked
    }
}

/// The `event` object of a Slack Events API callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

impl SlackEvent {
    /// A mention anywhere, or a direct message from a human.
    #[must_use]
    pub fn warrants_reply(&self) -> bool {
        match self.event_type.as_str() {
            "app_mention" => true,
            "message" => self.channel_type.as_deref() == Some("im") && self.bot_id.is_none(),
            _ => false,
        }
    }

    /// Thread to reply in: the existing thread, or a new one under the message itself.
    #[must_use]
    pub fn reply_thread_ts(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> SlackEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_phase_defaults_to_request() {
        assert_eq!(Phase::of(&json!({"body": "{}"})), Phase::Request);
        assert_eq!(Phase::of(&json!({"eventType": "request"})), Phase::Request);
        assert_eq!(Phase::of(&json!({"eventType": "something"})), Phase::Request);
        assert_eq!(Phase::of(&json!({"eventType": "answer"})), Phase::Answer);
    }

    #[test]
    fn test_mark_keeps_original_fields() {
        let payload = json!({"headers": {"a": "b"}, "body": "{}"});
        let marked = Phase::Answer.mark(&payload);

        assert_eq!(marked["eventType"], "answer");
        assert_eq!(marked["headers"], payload["headers"]);
        assert_eq!(marked["body"], payload["body"]);
        assert!(payload.get("eventType").is_none());
    }

    #[test]
    fn test_trigger_rules() {
        assert!(event(json!({"type": "app_mention", "channel_type": "channel"})).warrants_reply());
        assert!(event(json!({"type": "message", "channel_type": "im"})).warrants_reply());
        assert!(
            !event(json!({"type": "message", "channel_type": "im", "bot_id": "B1"}))
                .warrants_reply()
        );
        assert!(!event(json!({"type": "message", "channel_type": "channel"})).warrants_reply());
        assert!(!event(json!({"type": "reaction_added"})).warrants_reply());
    }

    #[test]
    fn test_reply_thread_falls_back_to_message_ts() {
        let top_level = event(json!({"type": "app_mention", "ts": "100"}));
        assert_eq!(top_level.reply_thread_ts(), "100");

        let threaded = event(json!({"type": "app_mention", "ts": "101", "thread_ts": "100"}));
        assert_eq!(threaded.reply_thread_ts(), "100");
    }
}
