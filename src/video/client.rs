//! Vormats CMS client
//!
//! Looks up subtitle metadata for a story and downloads the subtitle file.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::info;
use url::Url;

use super::links::extract_story_id;
use crate::ai::prompt_builder::transcript_block;
use crate::errors::BotError;

/// Source of transcript text for videos referenced in a message.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Transcript for the first video linked in `text`, ready to go into a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or download fails after a link was found.
    async fn fetch_transcript(&self, text: &str) -> Result<Option<String>, BotError>;
}

/// One entry of `result.subtitlesMeta`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleMeta {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub original: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub trimmed: bool,
    #[serde(default)]
    pub srt_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoryResponse {
    result: StoryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryResult {
    #[serde(default)]
    subtitles_meta: Vec<SubtitleMeta>,
}

// The CMS encodes flags as 1/0, booleans or numeric strings depending on the story age.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim() == "1" || s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// The original, trimmed subtitle track with a download path, if any.
#[must_use]
pub fn select_subtitles(metas: &[SubtitleMeta]) -> Option<&SubtitleMeta> {
    metas
        .iter()
        .find(|meta| meta.original && meta.trimmed && meta.srt_path.is_some())
}

pub struct VideoClient {
    http: Client,
    api_base: Url,
}

impl VideoClient {
    /// # Errors
    ///
    /// Returns an error if `api_base` is not an absolute URL.
    pub fn new(http: Client, api_base: &str) -> Result<Self, BotError> {
        let mut base = api_base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base = Url::parse(&base)
            .map_err(|e| BotError::VideoError(format!("Invalid video API base {base}: {e}")))?;

        Ok(Self { http, api_base })
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a story document.
    pub async fn subtitles_meta(&self, story_id: &str) -> Result<Vec<SubtitleMeta>, BotError> {
        let url = self
            .api_base
            .join(&format!("stories/{story_id}"))
            .map_err(|e| BotError::VideoError(format!("Invalid story URL: {e}")))?;

        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let story: StoryResponse = response.json().await.map_err(|e| {
            BotError::VideoError(format!("Unexpected story response for {story_id}: {e}"))
        })?;

        Ok(story.result.subtitles_meta)
    }

    /// # Errors
    ///
    /// Returns an error if the path is unusable or the download fails.
    pub async fn download_subtitles(&self, srt_path: &str) -> Result<String, BotError> {
        let url = Url::parse(srt_path)
            .or_else(|_| self.api_base.join(srt_path))
            .map_err(|e| BotError::VideoError(format!("Invalid subtitle path {srt_path}: {e}")))?;

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}

#[async_trait]
impl TranscriptSource for VideoClient {
    async fn fetch_transcript(&self, text: &str) -> Result<Option<String>, BotError> {
        let Some(story_id) = extract_story_id(text) else {
            return Ok(None);
        };

        let metas = self.subtitles_meta(story_id).await?;
        let Some(srt_path) = select_subtitles(&metas).and_then(|m| m.srt_path.as_deref()) else {
            info!(story_id = %story_id, "No original trimmed subtitles for story");
            return Ok(None);
        };

        let subtitles = self.download_subtitles(srt_path).await?;
        info!(story_id = %story_id, bytes = subtitles.len(), "Downloaded subtitles");

        Ok(Some(transcript_block(&subtitles)))
    }
}
