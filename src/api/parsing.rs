use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::core::models::SlackEvent;
use crate::errors::BotError;

pub const RETRY_NUM_HEADER: &str = "X-Slack-Retry-Num";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Whether Slack marked this delivery as a retry of an earlier one.
#[must_use]
pub fn is_retry_delivery(payload: &Value) -> bool {
    payload
        .get("headers")
        .is_some_and(|headers| get_header_value(headers, RETRY_NUM_HEADER).is_some())
}

/// The raw request body, base64-decoded when API Gateway flagged it so.
pub fn extract_body(payload: &Value) -> Result<String, BotError> {
    let body = payload
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| BotError::ParseError("Request body missing or not a string".to_string()))?;

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| BotError::ParseError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|e| BotError::ParseError(format!("Body is not UTF-8: {e}")))
}

/// The `event` object of an Events API body.
pub fn parse_slack_event(body: &Value) -> Result<SlackEvent, BotError> {
    let event = body
        .get("event")
        .ok_or_else(|| BotError::ParseError("Body has no event object".to_string()))?;
    serde_json::from_value(event.clone())
        .map_err(|e| BotError::ParseError(format!("Invalid event object: {e}")))
}
