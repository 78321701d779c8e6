use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatMemberKind, ChatPermissions, FileId, MessageId, ParseMode, ReplyParameters},
};

use crate::platform::{
    ChatPlatform,
    dto::{DownloadedFile, MemberStatus, PlatformError, Restriction},
};

pub const PLATFORM_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds a bot whose HTTP client gives up on stalled API calls.
pub fn build_bot(token: &str) -> Result<Bot, reqwest::Error> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(PLATFORM_TIMEOUT)
        .build()?;

    Ok(Bot::with_client(token, client))
}

#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, PlatformError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);

        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
        }

        let sent = request.await.inspect_err(|e| {
            log::warn!("Failed to send message to chat {}: {}", chat_id, e);
        })?;

        Ok(sent.id.0)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), PlatformError> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), PlatformError> {
        log::info!("Deleting message {} in chat {}", message_id, chat_id);

        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await?;

        Ok(())
    }

    async fn member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, PlatformError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await?;

        let status = match member.kind {
            ChatMemberKind::Owner(_) => MemberStatus::Creator,
            ChatMemberKind::Administrator(_) => MemberStatus::Administrator,
            ChatMemberKind::Member(_) => MemberStatus::Member,
            ChatMemberKind::Restricted(_) => MemberStatus::Restricted,
            ChatMemberKind::Left => MemberStatus::Left,
            ChatMemberKind::Banned(_) => MemberStatus::Banned,
        };

        Ok(status)
    }

    async fn download_file(&self, file_id: &str) -> Result<DownloadedFile, PlatformError> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;

        let mut data = Vec::new();
        self.bot.download_file(&file.path, &mut data).await?;

        log::info!("Downloaded {} ({} bytes)", file.path, data.len());

        Ok(DownloadedFile {
            path: file.path,
            data,
        })
    }

    async fn restrict_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> Result<(), PlatformError> {
        // Without an until_date the restriction never expires.
        let permissions = match restriction {
            Restriction::Mute => ChatPermissions::empty(),
            Restriction::Lift => ChatPermissions::all(),
        };

        self.bot
            .restrict_chat_member(ChatId(chat_id), UserId(user_id), permissions)
            .await
            .inspect_err(|e| {
                log::error!(
                    "Failed to apply {:?} to user {} in chat {}: {}",
                    restriction,
                    user_id,
                    chat_id,
                    e
                );
            })?;

        log::info!(
            "Applied {:?} to user {} in chat {}",
            restriction,
            user_id,
            chat_id
        );

        Ok(())
    }

    async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), PlatformError> {
        let url =
            reqwest::Url::parse(url).map_err(|e| PlatformError::InvalidUrl(e.to_string()))?;

        let mut request = self.bot.set_webhook(url);

        if let Some(secret) = secret_token {
            request = request.secret_token(secret.to_string());
        }

        request.await?;

        Ok(())
    }
}
