//! Webhook entry point and two-phase dispatch.
//!
//! A Slack delivery must be acknowledged within three seconds or Slack sends it
//! again. The request phase therefore only decides whether a reply is wanted and
//! schedules the answer phase; the answer phase runs the slow pipeline.
//!
//! Every path returns `{statusCode: 200}`. Failures are logged, never reported
//! back to Slack, so a broken downstream cannot cause a retry storm.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers::{ok_empty, ok_text};
use super::invoke::{AnswerInvoker, invoker_from_config};
use super::parsing::{
    SIGNATURE_HEADER, TIMESTAMP_HEADER, extract_body, get_header_value, is_retry_delivery,
    parse_slack_event,
};
use super::signature::verify_slack_signature;
use crate::core::config::AppConfig;
use crate::core::models::Phase;
use crate::errors::BotError;
use crate::slack::SlackBot;

pub const SKIPPING_RUN: &str = "Skipping run";
pub const ANSWER_SCHEDULED: &str = "Answer scheduled";
pub const ANSWERED: &str = "Answered";
pub const ANSWER_FAILED: &str = "Answer failed";
pub const IGNORED: &str = "Ignored";

/// Routes one invocation through the request or answer phase.
pub struct Dispatcher {
    bot: SlackBot,
    invoker: Box<dyn AnswerInvoker>,
    signing_secret: String,
}

impl Dispatcher {
    #[must_use]
    pub fn new(bot: SlackBot, invoker: Box<dyn AnswerInvoker>, signing_secret: String) -> Self {
        Self {
            bot,
            invoker,
            signing_secret,
        }
    }

    /// Builds every client once for the lifetime of the Lambda container.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be constructed.
    pub async fn from_config(config: &AppConfig) -> Result<Self, BotError> {
        let bot = SlackBot::new(config)?;
        let invoker = invoker_from_config(config).await;
        Ok(Self::new(bot, invoker, config.slack_signing_secret.clone()))
    }

    #[must_use]
    pub fn bot(&self) -> &SlackBot {
        &self.bot
    }

    /// Handles one webhook or answer-phase payload. Always a 200 response.
    pub async fn handle(&self, payload: Value) -> Value {
        if is_retry_delivery(&payload) {
            info!("Slack retry detected. Skipping run.");
            return ok_text(SKIPPING_RUN);
        }

        let phase = Phase::of(&payload);

        let raw_body = match extract_body(&payload) {
            Ok(body) => body,
            Err(e) => {
                error!(?phase, "Unusable request: {}", e);
                return ok_text(IGNORED);
            }
        };
        let body: Value = match serde_json::from_str(&raw_body) {
            Ok(body) => body,
            Err(e) => {
                error!(?phase, "Request body is not JSON: {}", e);
                return ok_text(IGNORED);
            }
        };

        match phase {
            Phase::Answer => self.handle_answer(&body).await,
            Phase::Request => self.handle_request(&payload, &raw_body, &body).await,
        }
    }

    async fn handle_answer(&self, body: &Value) -> Value {
        let event = match parse_slack_event(body) {
            Ok(event) => event,
            Err(e) => {
                error!("Answer phase without a usable event: {}", e);
                return ok_text(IGNORED);
            }
        };

        match self.bot.answer(&event).await {
            Ok(()) => ok_text(ANSWERED),
            Err(e) => {
                error!(
                    channel = %event.channel,
                    thread_ts = %event.reply_thread_ts(),
                    "Failed to answer: {}",
                    e
                );
                ok_text(ANSWER_FAILED)
            }
        }
    }

    async fn handle_request(&self, payload: &Value, raw_body: &str, body: &Value) -> Value {
        if !self.signature_is_valid(payload, raw_body) {
            return ok_text(IGNORED);
        }

        if body.get("type").and_then(Value::as_str) == Some("url_verification") {
            let challenge = body.get("challenge").and_then(Value::as_str).unwrap_or("");
            return ok_text(challenge);
        }

        let event = match parse_slack_event(body) {
            Ok(event) => event,
            Err(e) => {
                warn!("Ignoring callback without event: {}", e);
                return ok_empty();
            }
        };

        if !event.warrants_reply() {
            info!(event_type = %event.event_type, "Event does not warrant a reply");
            return ok_text(IGNORED);
        }

        match self.invoker.invoke_answer(&Phase::Answer.mark(payload)).await {
            Ok(()) => {
                info!(
                    event_type = %event.event_type,
                    channel = %event.channel,
                    "Scheduled answer phase"
                );
                ok_text(ANSWER_SCHEDULED)
            }
            Err(e) => {
                error!(channel = %event.channel, "Failed to schedule answer phase: {}", e);
                ok_text(IGNORED)
            }
        }
    }

    fn signature_is_valid(&self, payload: &Value, raw_body: &str) -> bool {
        let headers = payload.get("headers").unwrap_or(&Value::Null);
        let (Some(signature), Some(timestamp)) = (
            get_header_value(headers, SIGNATURE_HEADER),
            get_header_value(headers, TIMESTAMP_HEADER),
        ) else {
            warn!("Missing Slack signature headers");
            return false;
        };

        if verify_slack_signature(raw_body, timestamp, signature, &self.signing_secret) {
            true
        } else {
            warn!("Slack signature verification failed");
            false
        }
    }
}

/// Lambda handler for the webhook entrypoint.
///
/// # Errors
///
/// Never fails once the dispatcher exists; the `Result` satisfies the runtime.
#[tracing::instrument(level = "info", skip(dispatcher, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    dispatcher: &Dispatcher,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    #[cfg(feature = "debug-logs")]
    info!("Received payload: {:?}", event.payload);

    Ok(dispatcher.handle(event.payload).await)
}
