use std::sync::Arc;

use crate::{
    ai::prompt::build_prompt,
    error::{SetRulesError, StoreError},
    rules::dto::{GroupRules, MIN_RULES_LENGTH, rules_created_key, rules_key},
    store::KeyValueStore,
};

/// Per-chat rule text and its creation timestamp.
///
/// Reads fail soft: a store error is logged and reported as "no value".
/// Writes return the store error so callers can tell the user.
#[derive(Clone)]
pub struct RulesStore {
    store: Arc<dyn KeyValueStore>,
}

impl RulesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn rule_text(&self, chat_id: i64) -> Option<String> {
        match self.store.get(&rules_key(chat_id)).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read rules for chat {}: {}", chat_id, e);
                None
            }
        }
    }

    pub async fn rule_created_at(&self, chat_id: i64) -> Option<i64> {
        match self.store.get(&rules_created_key(chat_id)).await {
            Ok(value) => value.and_then(|raw| raw.trim().parse::<i64>().ok()),
            Err(e) => {
                log::warn!(
                    "Failed to read rules timestamp for chat {}: {}",
                    chat_id,
                    e
                );
                None
            }
        }
    }

    /// Rule text plus timestamp. `None` whenever the text is absent, whatever the timestamp says.
    pub async fn group_rules(&self, chat_id: i64) -> Option<GroupRules> {
        let text = self.rule_text(chat_id).await?;
        let created_at = self.rule_created_at(chat_id).await;

        Some(GroupRules { text, created_at })
    }

    /// Stores the trimmed rules stamped with the current time and returns the resulting prompt.
    pub async fn set_rules(&self, chat_id: i64, text: &str) -> Result<String, SetRulesError> {
        self.set_rules_at(chat_id, text, chrono::Utc::now().timestamp())
            .await
    }

    pub async fn set_rules_at(
        &self,
        chat_id: i64,
        text: &str,
        created_at: i64,
    ) -> Result<String, SetRulesError> {
        let trimmed = text.trim();
        let len = trimmed.chars().count();

        if len < MIN_RULES_LENGTH {
            return Err(SetRulesError::TooShort {
                len,
                min: MIN_RULES_LENGTH,
            });
        }

        self.store
            .set_all(&[
                (rules_key(chat_id), trimmed.to_string()),
                (rules_created_key(chat_id), created_at.to_string()),
            ])
            .await
            .inspect_err(|e| log::error!("Failed to save rules for chat {}: {}", chat_id, e))?;

        log::info!("Rules updated for chat {} ({} chars)", chat_id, len);

        Ok(build_prompt(trimmed))
    }

    pub async fn reset_rules(&self, chat_id: i64) -> Result<(), StoreError> {
        self.store
            .delete_all(&[rules_key(chat_id), rules_created_key(chat_id)])
            .await
            .inspect_err(|e| log::error!("Failed to reset rules for chat {}: {}", chat_id, e))?;

        log::info!("Rules reset for chat {}", chat_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const CHAT: i64 = -1001234567890;

    fn rules_store() -> (Arc<MemoryStore>, RulesStore) {
        let memory = Arc::new(MemoryStore::new());
        (memory.clone(), RulesStore::new(memory))
    }

    #[tokio::test]
    async fn test_set_then_get_returns_trimmed_text() {
        let (_, rules) = rules_store();

        let prompt = rules
            .set_rules(CHAT, "   No links and no advertising please.  \n")
            .await
            .unwrap();

        assert_eq!(
            rules.rule_text(CHAT).await.as_deref(),
            Some("No links and no advertising please.")
        );
        assert!(prompt.contains("No links and no advertising please."));
        assert!(rules.rule_created_at(CHAT).await.is_some());
    }

    #[tokio::test]
    async fn test_short_rules_rejected_and_previous_kept() {
        let (_, rules) = rules_store();
        rules
            .set_rules_at(CHAT, "Be kind to each other, always.", 100)
            .await
            .unwrap();

        let err = rules
            .set_rules(CHAT, "    too short rule     ")
            .await
            .unwrap_err();

        assert!(matches!(err, SetRulesError::TooShort { len: 14, min: 20 }));
        assert_eq!(
            rules.rule_text(CHAT).await.as_deref(),
            Some("Be kind to each other, always.")
        );
        assert_eq!(rules.rule_created_at(CHAT).await, Some(100));
    }

    #[tokio::test]
    async fn test_length_counts_characters() {
        let (_, rules) = rules_store();

        // 19 multi-byte characters
        let err = rules.set_rules(CHAT, &"é".repeat(19)).await.unwrap_err();
        assert!(matches!(err, SetRulesError::TooShort { len: 19, .. }));

        assert!(rules.set_rules(CHAT, &"é".repeat(20)).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_removes_both_keys() {
        let (memory, rules) = rules_store();
        rules
            .set_rules_at(CHAT, "No spam, no scams, no bots.", 42)
            .await
            .unwrap();

        rules.reset_rules(CHAT).await.unwrap();

        assert_eq!(rules.rule_text(CHAT).await, None);
        assert_eq!(rules.rule_created_at(CHAT).await, None);
        assert!(!memory.contains(&rules_key(CHAT)));
        assert!(!memory.contains(&rules_created_key(CHAT)));
    }

    #[tokio::test]
    async fn test_store_errors_read_as_absent() {
        let (memory, rules) = rules_store();
        rules
            .set_rules_at(CHAT, "No spam, no scams, no bots.", 42)
            .await
            .unwrap();

        memory.set_failing(true);

        assert_eq!(rules.rule_text(CHAT).await, None);
        assert_eq!(rules.rule_created_at(CHAT).await, None);
        assert!(matches!(
            rules.set_rules(CHAT, "Another long enough rule text").await,
            Err(SetRulesError::Store(_))
        ));
        assert!(rules.reset_rules(CHAT).await.is_err());
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_is_absent() {
        let (memory, rules) = rules_store();
        memory.insert(&rules_key(CHAT), "Stay on topic at all times.");
        memory.insert(&rules_created_key(CHAT), "yesterday");

        assert_eq!(rules.rule_created_at(CHAT).await, None);
        assert_eq!(
            rules.group_rules(CHAT).await,
            Some(GroupRules {
                text: "Stay on topic at all times.".to_string(),
                created_at: None,
            })
        );
    }

    #[tokio::test]
    async fn test_timestamp_without_text_means_no_rules() {
        let (memory, rules) = rules_store();
        memory.insert(&rules_created_key(CHAT), "1700000000");

        assert_eq!(rules.group_rules(CHAT).await, None);
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let (_, rules) = rules_store();
        rules
            .set_rules_at(CHAT, "Rules for the first group only.", 1)
            .await
            .unwrap();

        assert_eq!(rules.rule_text(CHAT + 1).await, None);
    }
}
