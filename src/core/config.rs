use std::env;

use openai_api_rs::v1::common::GPT3_5_TURBO;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_VIDEO_API_BASE: &str = "https://cms.vormats.com/api/v4";
pub const DEFAULT_AWS_REGION: &str = "eu-west-1";
pub const DEFAULT_ANSWER_FUNCTION_NAME: &str = "BotAnswerFunction";

/// Process-wide settings, read once per cold start and passed by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_signing_secret: String,
    pub slack_bot_token: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub openai_api_base: String,
    pub video_api_base: String,
    pub aws_region: String,
    pub answer_function_name: String,
    /// When set, the answer phase is handed to a worker through SQS instead of a
    /// direct asynchronous Lambda invoke.
    pub answer_queue_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("{key}: environment variable not found"))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_org_id: optional("OPENAI_ORG_ID"),
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| GPT3_5_TURBO.to_string()),
            openai_api_base: optional("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            video_api_base: optional("VIDEO_API_BASE")
                .unwrap_or_else(|| DEFAULT_VIDEO_API_BASE.to_string()),
            aws_region: optional("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            answer_function_name: optional("ANSWER_FUNCTION_NAME")
                .unwrap_or_else(|| DEFAULT_ANSWER_FUNCTION_NAME.to_string()),
            answer_queue_url: optional("ANSWER_QUEUE_URL"),
        })
    }
}
