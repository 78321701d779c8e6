//! Utility functions for warden_bot.

use chrono::{DateTime, Utc};
use teloxide::utils::html;

use crate::{platform::ChatPlatform, report::dto::Sender};

/// Telegram rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Helper function to format Unix timestamp into readable date and time
pub fn format_timestamp(timestamp: i64) -> String {
    let datetime = DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.format("%Y-%m-%d at %H:%M UTC").to_string()
}

/// Visible mention: @username when available, else a clickable first name.
pub fn user_mention(sender: &Sender) -> String {
    if let Some(username) = &sender.username {
        format!("@{}", username)
    } else {
        format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            sender.id,
            html::escape(&sender.first_name)
        )
    }
}

/// HTML-escapes `text`, cutting it so the escaped result fits in `max_chars`.
/// A cut is marked with an ellipsis and never splits an entity.
pub fn escape_within(text: &str, max_chars: usize) -> String {
    let escaped = html::escape(text);
    if escaped.chars().count() <= max_chars {
        return escaped;
    }

    let budget = max_chars.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let piece = html::escape(ch.encode_utf8(&mut [0; 4]));
        let len = piece.chars().count();
        if used + len > budget {
            break;
        }
        used += len;
        out.push_str(&piece);
    }

    out.push('…');
    out
}

/// Guesses the image MIME type from the platform file path.
pub fn image_mime_type(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match extension.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Sends `text` and returns the new message id, logging instead of failing.
pub async fn send_reply(
    platform: &dyn ChatPlatform,
    chat_id: i64,
    text: &str,
    reply_to: Option<i32>,
) -> Option<i32> {
    match platform.send_message(chat_id, text, reply_to).await {
        Ok(message_id) => Some(message_id),
        Err(e) => {
            log::error!("Failed to send reply in chat {}: {}", chat_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 at 22:13 UTC");
    }

    #[test]
    fn test_user_mention() {
        let with_username = Sender {
            id: 7,
            first_name: "Ann".to_string(),
            username: Some("ann_k".to_string()),
        };
        assert_eq!(user_mention(&with_username), "@ann_k");

        let without_username = Sender {
            id: 8,
            first_name: "<Bob>".to_string(),
            username: None,
        };
        assert_eq!(
            user_mention(&without_username),
            "<a href=\"tg://user?id=8\">&lt;Bob&gt;</a>"
        );
    }

    #[test]
    fn test_escape_within() {
        assert_eq!(escape_within("a<b", 10), "a&lt;b");
        assert_eq!(escape_within("abcdefghij", 5), "abcd…");
        assert_eq!(escape_within("ééééé", 3), "éé…");
        assert_eq!(escape_within("<<<", 6), "&lt;…");
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type("photos/file_1.jpg"), "image/jpeg");
        assert_eq!(image_mime_type("photos/file_2.PNG"), "image/png");
        assert_eq!(image_mime_type("photos/file_3.webp"), "image/webp");
        assert_eq!(image_mime_type("photos/file_4"), "image/jpeg");
    }
}
