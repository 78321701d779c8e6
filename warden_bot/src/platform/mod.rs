pub mod dto;
pub mod telegram;

use async_trait::async_trait;

use crate::platform::dto::{DownloadedFile, MemberStatus, PlatformError, Restriction};

pub use telegram::TelegramPlatform;

/// The subset of the chat platform API the bot relies on.
///
/// Text is sent as HTML; callers escape anything user-provided.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Returns the id of the sent message.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, PlatformError>;

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), PlatformError>;

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), PlatformError>;

    async fn member_status(&self, chat_id: i64, user_id: u64)
    -> Result<MemberStatus, PlatformError>;

    async fn download_file(&self, file_id: &str) -> Result<DownloadedFile, PlatformError>;

    async fn restrict_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> Result<(), PlatformError>;

    async fn set_webhook(&self, url: &str, secret_token: Option<&str>)
    -> Result<(), PlatformError>;
}
