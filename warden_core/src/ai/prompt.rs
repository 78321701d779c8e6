pub const RULES_PLACEHOLDER: &str = "{{GROUP_RULES}}";

const PROMPT_TEMPLATE: &str = r#"You are a strict but fair moderator for a Telegram group chat.

Judge ONLY the reported message against the group rules below. Do not apply any rule that is not listed. Treat the text, any button labels, and any attached image as part of the same message.

Group rules:
{{GROUP_RULES}}

Answer in exactly two lines:
- Line 1: YES if the message violates any of the rules, otherwise NO.
- Line 2: a short reason (one sentence, no more than 20 words).

Do not add anything else."#;

/// Substitutes the trimmed rule text into the moderation template.
pub fn build_prompt(rules: &str) -> String {
    PROMPT_TEMPLATE.replacen(RULES_PLACEHOLDER, rules.trim(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_contains_rules() {
        let prompt = build_prompt("no spam");

        assert!(prompt.contains("no spam"));
        assert!(!prompt.contains(RULES_PLACEHOLDER));
    }

    #[test]
    fn test_build_prompt_trims_rules() {
        let prompt = build_prompt("   \n no links allowed \n\n");

        assert!(prompt.contains("Group rules:\nno links allowed\n\nAnswer"));
    }

    #[test]
    fn test_template_has_single_placeholder() {
        assert_eq!(PROMPT_TEMPLATE.matches(RULES_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_placeholder_in_rules_is_kept_verbatim() {
        let rules = format!("keep {} literally", RULES_PLACEHOLDER);
        let prompt = build_prompt(&rules);

        assert!(prompt.contains(&rules));
    }
}
