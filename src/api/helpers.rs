//! Response builders for the webhook handler.
//!
//! Slack only ever sees a 200; anything that went wrong is in the logs.

use serde_json::{Value, json};

/// Returns a 200 OK response with a plain text body.
#[must_use]
pub fn ok_text(body: &str) -> Value {
    json!({ "statusCode": 200, "body": body })
}

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Value {
    ok_text("{}")
}
