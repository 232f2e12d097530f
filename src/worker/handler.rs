use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use crate::api::Dispatcher;
use crate::core::models::Phase;
use crate::errors::BotError;

/// Answer-phase payloads inside an invocation.
///
/// A direct asynchronous invoke carries one payload; an SQS batch carries one per
/// record, as a JSON string in `body`. Queue records are answer tasks by
/// construction, so they are tagged even if the marker was lost.
pub fn answer_payloads(event: &Value) -> Result<Vec<Value>, BotError> {
    let Some(records) = event.get("Records") else {
        return Ok(vec![event.clone()]);
    };

    let records = records
        .as_array()
        .ok_or_else(|| BotError::ParseError("Records is not an array".to_string()))?;

    records
        .iter()
        .map(|record| {
            let body = record
                .get("body")
                .and_then(Value::as_str)
                .ok_or_else(|| BotError::ParseError("Failed to extract SQS message body".to_string()))?;
            let payload: Value = serde_json::from_str(body).map_err(|e| {
                BotError::ParseError(format!("Failed to parse SQS message body: {e}"))
            })?;
            Ok(Phase::Answer.mark(&payload))
        })
        .collect()
}

/// Lambda handler for the Worker entrypoint.
///
/// # Errors
///
/// Returns an error only for an envelope that cannot be unpacked.
pub async fn function_handler(
    dispatcher: &Dispatcher,
    event: LambdaEvent<Value>,
) -> Result<(), Error> {
    let payloads = answer_payloads(&event.payload).map_err(|e| {
        error!("Unreadable worker event: {}", e);
        Error::from(e.to_string())
    })?;

    info!(count = payloads.len(), "Worker received answer tasks");

    for payload in payloads {
        let response = dispatcher.handle(payload).await;
        info!(outcome = %response["body"], "Answer task finished");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_invoke_passes_through() {
        let event = json!({ "eventType": "answer", "body": "{}", "headers": {} });
        let payloads = answer_payloads(&event).unwrap();
        assert_eq!(payloads, vec![event]);
    }

    #[test]
    fn test_sqs_records_are_unwrapped_and_tagged() {
        let first = json!({ "eventType": "answer", "body": "{\"n\":1}" });
        let second = json!({ "body": "{\"n\":2}" });
        let event = json!({
            "Records": [
                { "messageId": "1", "body": first.to_string() },
                { "messageId": "2", "body": second.to_string() }
            ]
        });

        let payloads = answer_payloads(&event).unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], first);
        assert_eq!(payloads[1]["eventType"], "answer");
        assert_eq!(payloads[1]["body"], "{\"n\":2}");
    }

    #[test]
    fn test_malformed_records_rejected() {
        assert!(answer_payloads(&json!({ "Records": {} })).is_err());
        assert!(answer_payloads(&json!({ "Records": [{ "messageId": "1" }] })).is_err());
        assert!(answer_payloads(&json!({ "Records": [{ "body": "not json" }] })).is_err());
    }
}
