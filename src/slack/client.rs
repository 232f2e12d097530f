//! Slack API client module
//!
//! Thread history lookup and threaded replies through slack-morphism.

use async_trait::async_trait;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackApiConversationsRepliesRequest,
};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackHistoryMessage, SlackMessageContent,
    SlackTs,
};
use tracing::debug;

use crate::errors::BotError;

/// The chat operations the answer pipeline depends on.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Texts of every message in a thread, parent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    async fn thread_messages(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<String>, BotError>;

    /// Posts `text` into the thread anchored at `thread_ts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    async fn post_reply(&self, channel_id: &str, thread_ts: &str, text: &str)
    -> Result<(), BotError>;
}

/// Slack Web API client bound to the bot token
pub struct SlackClient {
    client: SlackHyperClient,
    token: SlackApiToken,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns an error if the HTTPS connector cannot be built.
    pub fn new(token: String) -> Result<Self, BotError> {
        let connector = SlackClientHyperConnector::new().map_err(|e| {
            BotError::GeneralError(format!("Failed to create Slack HTTP connector: {e}"))
        })?;

        Ok(Self {
            client: SlackHyperClient::new(connector),
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        })
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }
}

/// Message text, with missing text read as empty.
#[must_use]
pub fn message_text(message: &SlackHistoryMessage) -> String {
    message.content.text.clone().unwrap_or_default()
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn thread_messages(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<String>, BotError> {
        let session = self.client.open_session(&self.token);
        let request = SlackApiConversationsRepliesRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackTs::new(thread_ts.to_string()),
        );

        let result = session.conversations_replies(&request).await?;
        debug!(
            channel = %channel_id,
            thread_ts = %thread_ts,
            count = result.messages.len(),
            "Fetched thread replies"
        );

        Ok(result.messages.iter().map(message_text).collect())
    }

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError> {
        let session = self.client.open_session(&self.token);
        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(text.to_string()),
        )
        .with_thread_ts(SlackTs::new(thread_ts.to_string()));

        session.chat_post_message(&post_req).await?;
        Ok(())
    }
}
