#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use answerbot::BotError;
use answerbot::ai::CompletionModel;
use answerbot::api::signature::compute_signature;
use answerbot::api::{AnswerInvoker, Dispatcher};
use answerbot::slack::{ChatPlatform, SlackBot};
use answerbot::video::TranscriptSource;
use async_trait::async_trait;
use serde_json::{Value, json};

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Everything the fakes saw, shared with the test after the fakes are boxed.
#[derive(Clone, Default)]
pub struct Calls {
    pub thread_lookups: Arc<Mutex<Vec<(String, String)>>>,
    pub posts: Arc<Mutex<Vec<(String, String, String)>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub transcript_lookups: Arc<Mutex<Vec<String>>>,
    pub invocations: Arc<Mutex<Vec<Value>>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.thread_lookups.lock().unwrap().len()
            + self.posts.lock().unwrap().len()
            + self.prompts.lock().unwrap().len()
            + self.transcript_lookups.lock().unwrap().len()
            + self.invocations.lock().unwrap().len()
    }
}

pub struct FakeChat {
    pub calls: Calls,
    pub thread: Vec<String>,
    pub fail_lookup: bool,
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn thread_messages(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<String>, BotError> {
        self.calls
            .thread_lookups
            .lock()
            .unwrap()
            .push((channel_id.to_string(), thread_ts.to_string()));
        if self.fail_lookup {
            return Err(BotError::ApiError("channel_not_found".to_string()));
        }
        Ok(self.thread.clone())
    }

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError> {
        self.calls.posts.lock().unwrap().push((
            channel_id.to_string(),
            thread_ts.to_string(),
            text.to_string(),
        ));
        Ok(())
    }
}

pub struct FakeModel {
    pub calls: Calls,
    pub answer: Result<String, String>,
}

#[async_trait]
impl CompletionModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        self.calls.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone().map_err(BotError::OpenAIError)
    }
}

pub struct FakeTranscripts {
    pub calls: Calls,
    pub transcript: Option<String>,
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch_transcript(&self, text: &str) -> Result<Option<String>, BotError> {
        self.calls
            .transcript_lookups
            .lock()
            .unwrap()
            .push(text.to_string());
        Ok(self.transcript.clone())
    }
}

pub struct FakeInvoker {
    pub calls: Calls,
    pub fail: bool,
}

#[async_trait]
impl AnswerInvoker for FakeInvoker {
    async fn invoke_answer(&self, payload: &Value) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::AwsError("AccessDenied".to_string()));
        }
        self.calls.invocations.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Knobs for a fake-backed dispatcher.
pub struct Setup {
    pub thread: Vec<String>,
    pub fail_lookup: bool,
    pub answer: Result<String, String>,
    pub transcript: Option<String>,
    pub fail_invoke: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            thread: Vec::new(),
            fail_lookup: false,
            answer: Ok("model answer".to_string()),
            transcript: None,
            fail_invoke: false,
        }
    }
}

impl Setup {
    pub fn build(self) -> (Dispatcher, Calls) {
        let calls = Calls::default();
        let bot = SlackBot::from_parts(
            Box::new(FakeChat {
                calls: calls.clone(),
                thread: self.thread,
                fail_lookup: self.fail_lookup,
            }),
            Box::new(FakeModel {
                calls: calls.clone(),
                answer: self.answer,
            }),
            Box::new(FakeTranscripts {
                calls: calls.clone(),
                transcript: self.transcript,
            }),
        );
        let invoker = FakeInvoker {
            calls: calls.clone(),
            fail: self.fail_invoke,
        };
        let dispatcher = Dispatcher::new(bot, Box::new(invoker), SIGNING_SECRET.to_string());
        (dispatcher, calls)
    }
}

pub fn now_ts() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .to_string()
}

/// A Lambda proxy payload for `event`, signed the way Slack signs deliveries.
pub fn signed_delivery(event: Value) -> Value {
    let body = json!({ "type": "event_callback", "event": event }).to_string();
    signed_body(&body)
}

pub fn signed_body(body: &str) -> Value {
    let ts = now_ts();
    let signature = compute_signature(&ts, body, SIGNING_SECRET);
    json!({
        "headers": {
            "content-type": "application/json",
            "x-slack-request-timestamp": ts,
            "x-slack-signature": signature
        },
        "body": body,
        "isBase64Encoded": false
    })
}

/// Answer-phase payload, as the request phase would have produced it.
pub fn answer_delivery(event: Value) -> Value {
    let mut payload = signed_delivery(event);
    payload["eventType"] = json!("answer");
    payload
}
