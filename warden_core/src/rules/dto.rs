pub const MIN_RULES_LENGTH: usize = 20;

pub fn rules_key(chat_id: i64) -> String {
    format!("group_simple_rules:{}", chat_id)
}

pub fn rules_created_key(chat_id: i64) -> String {
    format!("group_rules_created:{}", chat_id)
}

/// Rule text and creation time of one chat, as shown by `/rules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRules {
    pub text: String,
    pub created_at: Option<i64>,
}
