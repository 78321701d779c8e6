use crate::platform::ChatPlatform;

/// Shared ids Telegram uses for messages that are not attributed to a person:
/// anonymous group admins, posts sent on behalf of a channel, and posts
/// forwarded from a linked channel. They act with the group's own authority.
pub const ANONYMOUS_SENDER_IDS: [u64; 3] = [1087968824, 136817688, 777000];

pub fn is_anonymous_sender(user_id: u64) -> bool {
    ANONYMOUS_SENDER_IDS.contains(&user_id)
}

/// Admins, the creator and anonymous group identities are exempt from moderation
/// and may run admin commands. A failed status lookup counts as not exempt.
pub async fn is_exempt(platform: &dyn ChatPlatform, chat_id: i64, user_id: u64) -> bool {
    if is_anonymous_sender(user_id) {
        return true;
    }

    match platform.member_status(chat_id, user_id).await {
        Ok(status) => status.is_privileged(),
        Err(e) => {
            log::warn!(
                "AUTH: Failed to get member status of {} in chat {}: {}",
                user_id,
                chat_id,
                e
            );
            false
        }
    }
}
