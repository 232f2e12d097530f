//! Hand-off of the answer phase to a second, asynchronous invocation.

use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_sqs::Client as SqsClient;
use serde_json::Value;
use tracing::info;

use crate::core::config::AppConfig;
use crate::errors::BotError;

/// Schedules the answer phase without waiting for it to run.
#[async_trait]
pub trait AnswerInvoker: Send + Sync {
    /// Submits `payload`, already tagged with the answer phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the submission.
    async fn invoke_answer(&self, payload: &Value) -> Result<(), BotError>;
}

/// Asynchronous (`InvocationType::Event`) invoke of the answer function.
pub struct LambdaInvoker {
    client: LambdaClient,
    function_name: String,
}

impl LambdaInvoker {
    #[must_use]
    pub fn new(client: LambdaClient, function_name: String) -> Self {
        Self {
            client,
            function_name,
        }
    }
}

#[async_trait]
impl AnswerInvoker for LambdaInvoker {
    async fn invoke_answer(&self, payload: &Value) -> Result<(), BotError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| BotError::GeneralError(format!("Failed to serialize payload: {e}")))?;

        self.client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                BotError::AwsError(format!(
                    "Failed to invoke {}: {}",
                    self.function_name,
                    DisplayErrorContext(&e)
                ))
            })?;

        info!(function_name = %self.function_name, "Answer invocation scheduled");
        Ok(())
    }
}

/// Hands the payload to a worker through an SQS queue.
pub struct SqsInvoker {
    client: SqsClient,
    queue_url: String,
}

impl SqsInvoker {
    #[must_use]
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl AnswerInvoker for SqsInvoker {
    async fn invoke_answer(&self, payload: &Value) -> Result<(), BotError> {
        let message_body = serde_json::to_string(payload)
            .map_err(|e| BotError::GeneralError(format!("Failed to serialize payload: {e}")))?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message_body)
            .send()
            .await
            .map_err(|e| BotError::AwsError(format!("Failed to send message to SQS: {e}")))?;

        info!(queue_url = %self.queue_url, "Answer task queued");
        Ok(())
    }
}

/// Picks the queue when one is configured, the direct invoke otherwise.
pub async fn invoker_from_config(config: &AppConfig) -> Box<dyn AnswerInvoker> {
    let shared_config = aws_config::from_env()
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    match &config.answer_queue_url {
        Some(queue_url) => Box::new(SqsInvoker::new(
            SqsClient::new(&shared_config),
            queue_url.clone(),
        )),
        None => Box::new(LambdaInvoker::new(
            LambdaClient::new(&shared_config),
            config.answer_function_name.clone(),
        )),
    }
}
