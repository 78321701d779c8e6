use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

pub const NO_RESPONSE_REASON: &str = "No analysis response";
pub const UNAVAILABLE_REASON: &str = "Analysis unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub violates: bool,
    pub reason: String,
}

impl Verdict {
    pub fn clean(reason: impl Into<String>) -> Self {
        Self {
            violates: false,
            reason: reason.into(),
        }
    }

    /// Parses the model's two-line answer: a YES/NO decision followed by the reason.
    pub fn from_response(text: &str) -> Self {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let Some(decision) = lines.next() else {
            return Self::clean(NO_RESPONSE_REASON);
        };

        Self {
            violates: decision.eq_ignore_ascii_case("YES"),
            reason: lines.collect::<Vec<_>>().join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContent {
    pub text: String,
    pub image: Option<InlineImage>,
}

impl UserContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl From<&UserContent> for MessageContent {
    fn from(content: &UserContent) -> Self {
        match &content.image {
            None => MessageContent::Text(content.text.clone()),
            Some(image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: content.text.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_with_reason() {
        let verdict = Verdict::from_response("YES\nContains a prohibited link");

        assert_eq!(
            verdict,
            Verdict {
                violates: true,
                reason: "Contains a prohibited link".to_string(),
            }
        );
    }

    #[test]
    fn test_decision_is_case_insensitive() {
        let verdict = Verdict::from_response("no\nfine");

        assert!(!verdict.violates);
        assert_eq!(verdict.reason, "fine");

        assert!(Verdict::from_response("Yes\nbad").violates);
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(Verdict::from_response(""), Verdict::clean(NO_RESPONSE_REASON));
        assert_eq!(
            Verdict::from_response("  \n\n \n"),
            Verdict::clean(NO_RESPONSE_REASON)
        );
    }

    #[test]
    fn test_reason_lines_are_joined() {
        let verdict = Verdict::from_response("  YES  \n\n posts a link \n  and asks for DMs \n");

        assert!(verdict.violates);
        assert_eq!(verdict.reason, "posts a link and asks for DMs");
    }

    #[test]
    fn test_anything_but_yes_is_clean() {
        assert!(!Verdict::from_response("YES, definitely\nreason").violates);
        assert!(!Verdict::from_response("maybe\nreason").violates);
    }

    #[test]
    fn test_text_only_content_serializes_as_string() {
        let content = MessageContent::from(&UserContent::text("hello"));

        assert_eq!(serde_json::to_value(content).unwrap(), serde_json::json!("hello"));
    }

    #[test]
    fn test_image_content_serializes_as_inline_data() {
        let content = UserContent::text("look")
            .with_image(InlineImage::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]));
        let value = serde_json::to_value(MessageContent::from(&content)).unwrap();

        assert_eq!(value[0]["type"], "text");
        assert_eq!(value[0]["text"], "look");
        assert_eq!(value[1]["type"], "image_url");
        assert_eq!(value[1]["image_url"]["url"], "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_response_text_extraction() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"NO\nok"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("NO\nok"));

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.into_text(), None);
    }
}
