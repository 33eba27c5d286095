use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Port for the homework-status source.
///
/// Returns the raw JSON body; shape validation stays in the core
/// (`domain::validate_response`) so transport and shape failures are
/// reported separately.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, since: i64) -> Result<serde_json::Value>;
}

/// Port for the notification sink.
///
/// Telegram is the first implementation; the shape is kept minimal so other
/// messengers can fit behind the same interface.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
