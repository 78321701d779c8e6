use teloxide::types::Message;

use crate::report::dto::ReportTarget;

/// What a command handler needs to know about the message that carried the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub chat_id: i64,
    /// Group or supergroup.
    pub is_group: bool,
    pub message_id: i32,
    pub sender_id: Option<u64>,
    pub reply_to: Option<ReportTarget>,
}

impl From<&Message> for CommandContext {
    fn from(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id.0,
            is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
            message_id: msg.id.0,
            sender_id: msg.from.as_ref().map(|user| user.id.0),
            reply_to: msg.reply_to_message().map(ReportTarget::from),
        }
    }
}
