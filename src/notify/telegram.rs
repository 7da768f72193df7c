use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};

use super::Publisher;
use crate::errors::PublishError;

/// Telegram caps message text at 4096 characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramPublisher {
    bot: Bot,
}

impl TelegramPublisher {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    /// Send through another Bot API host (tests, local Bot API server).
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }
}

pub fn channel_recipient(channel: &str) -> Recipient {
    Recipient::ChannelUsername(format!("@{}", channel.trim_start_matches('@')))
}

#[async_trait::async_trait]
impl Publisher for TelegramPublisher {
    #[allow(deprecated)] // legacy Markdown matches the escaping in `ingest::escape_markdown`
    async fn publish(&self, channel: &str, text: &str) -> Result<(), PublishError> {
        let chars = text.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(PublishError::Rejected(format!(
                "message is {chars} characters, limit is {MAX_MESSAGE_CHARS}"
            )));
        }

        self.bot
            .send_message(channel_recipient(channel), text)
            .parse_mode(ParseMode::Markdown)
            .await?;

        tracing::info!(channel, chars, "digest sent to channel");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
