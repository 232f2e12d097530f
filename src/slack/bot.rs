use reqwest::Client;
use tracing::info;

use super::client::{ChatPlatform, SlackClient};
use crate::ai::prompt_builder::{compose_prompt, format_conversation_context};
use crate::ai::{CompletionModel, LlmClient};
use crate::core::config::AppConfig;
use crate::core::models::SlackEvent;
use crate::errors::BotError;
use crate::video::{TranscriptSource, VideoClient};

/// The answer pipeline: Slack on both ends, the model and the video CMS in between.
pub struct SlackBot {
    chat: Box<dyn ChatPlatform>,
    llm: Box<dyn CompletionModel>,
    transcripts: Box<dyn TranscriptSource>,
}

impl SlackBot {
    /// Construct a `SlackBot` from configuration, sharing one HTTP client between
    /// the completion and video APIs.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack connector or the video API base cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        let http = Client::new();
        let chat = SlackClient::new(config.slack_bot_token.clone())?;
        let llm = LlmClient::new(
            http.clone(),
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.openai_model.clone(),
            config.openai_api_base.clone(),
        );
        let transcripts = VideoClient::new(http, &config.video_api_base)?;

        Ok(Self::from_parts(
            Box::new(chat),
            Box::new(llm),
            Box::new(transcripts),
        ))
    }

    #[must_use]
    pub fn from_parts(
        chat: Box<dyn ChatPlatform>,
        llm: Box<dyn CompletionModel>,
        transcripts: Box<dyn TranscriptSource>,
    ) -> Self {
        Self {
            chat,
            llm,
            transcripts,
        }
    }

    /// Prior messages of `thread` as a prompt prefix.
    ///
    /// `None` for top-level messages and for threads holding only the trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be read from Slack.
    pub async fn build_conversation_context(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
    ) -> Result<Option<String>, BotError> {
        let Some(thread_ts) = thread_ts else {
            return Ok(None);
        };

        let texts = self.chat.thread_messages(channel_id, thread_ts).await?;
        Ok(format_conversation_context(texts.as_slice()))
    }

    /// Composes the prompt for `text` and asks the model.
    ///
    /// # Errors
    ///
    /// Returns the first error from Slack, the video CMS or the model.
    pub async fn process_request(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        text: &str,
    ) -> Result<String, BotError> {
        let (context, transcript) = futures::try_join!(
            self.build_conversation_context(channel_id, thread_ts),
            self.transcripts.fetch_transcript(text),
        )?;

        info!(
            channel = %channel_id,
            has_context = context.is_some(),
            has_transcript = transcript.is_some(),
            "Composed prompt"
        );

        let prompt = compose_prompt(context.as_deref(), transcript.as_deref(), text);
        self.llm.complete(&prompt).await
    }

    /// Produces an answer for `event` and posts it into the event's thread.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the pipeline fails; nothing is posted then.
    pub async fn answer(&self, event: &SlackEvent) -> Result<(), BotError> {
        let answer = self
            .process_request(&event.channel, event.thread_ts.as_deref(), &event.text)
            .await?;

        self.chat
            .post_reply(&event.channel, event.reply_thread_ts(), &answer)
            .await?;

        info!(
            channel = %event.channel,
            thread_ts = %event.reply_thread_ts(),
            "Answer posted"
        );
        Ok(())
    }
}
