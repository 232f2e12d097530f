use answerbot::errors::BotError;
use std::error::Error;

#[test]
fn test_bot_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = BotError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_bot_error_display() {
    let error = BotError::ApiError("API failed".to_string());
    assert_eq!(format!("{error}"), "Failed to access Slack API: API failed");

    let error = BotError::OpenAIError("Model unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access OpenAI API: Model unavailable"
    );

    let error = BotError::VideoError("story not found".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access video API: story not found"
    );

    let error = BotError::AwsError("AccessDenied".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to interact with AWS services: AccessDenied"
    );
}

#[test]
fn test_bot_error_from_conversions() {
    let err = anyhow::anyhow!("test error");
    let bot_err: BotError = err.into();
    match bot_err {
        BotError::GeneralError(msg) => assert!(msg.contains("test error")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(BotError::from(json_err), BotError::ParseError(_)));

    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> BotError {
        BotError::from(err)
    }
}
