pub mod telegram;

use crate::errors::PublishError;

pub use telegram::TelegramPublisher;

/// Delivers the composed digest to a channel.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, channel: &str, text: &str) -> Result<(), PublishError>;
    fn name(&self) -> &'static str;
}

/// Logs the message instead of sending it (`--dry-run`).
pub struct LogPublisher;

#[async_trait::async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, channel: &str, text: &str) -> Result<(), PublishError> {
        tracing::info!(channel, chars = text.chars().count(), "dry run, not sending");
        tracing::info!("\n{text}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
