use answerbot::api::{Dispatcher, handler};
use answerbot::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    answerbot::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Config error: {}", e);
        Error::from(e)
    })?;
    let dispatcher = Dispatcher::from_config(&config).await?;
    let dispatcher = &dispatcher;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(dispatcher, event).await
    }))
    .await
}
