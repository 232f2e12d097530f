/// answerbot - A Slack bot that answers mentions and direct messages with ChatGPT,
/// using the thread history and Vormats video subtitles as context.
///
/// # Architecture
///
/// Slack expects a webhook acknowledgment within three seconds, so every reply
/// takes two Lambda invocations:
/// 1. The API Lambda verifies the delivery, drops Slack retries, and schedules the
///    answer phase (asynchronous Lambda invoke, or SQS when a queue is configured)
/// 2. The answer invocation builds the prompt, asks the model, and replies in thread
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - Lambda async invoke or SQS to hand off the answer phase
/// - slack-morphism for Slack API interactions
/// - reqwest for the completion and video APIs
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use answerbot::api::Dispatcher;
/// use answerbot::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     answerbot::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let dispatcher = Dispatcher::from_config(&config).await?;
///
///     let answer = dispatcher
///         .bot()
///         .process_request("C12345678", None, "What is in https://secure.vormats.com/engage/3f2b8c1e-9a4d-4e7f-8b21-0c5d6e7f8a9b ?")
///         .await?;
///     println!("{answer}");
///
///     Ok(())
/// }
/// ```
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod slack;
pub mod video;
pub mod worker;

pub use ai::estimate_tokens;
pub use errors::BotError;
pub use slack::SlackBot;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs. The level comes from `RUST_LOG` and defaults
/// to `info`. Calling it again is a no-op.
///
/// # Example
///
/// ```
/// answerbot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
