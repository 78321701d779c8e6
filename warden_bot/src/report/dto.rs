use teloxide::types::Message;

/// Sender of a reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Snapshot of the replied-to message a `/report` points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    pub message_id: i32,
    pub sender: Option<Sender>,
    /// Text or caption.
    pub text: Option<String>,
    /// Largest size of an attached photo, or a document sent with an `image/*` type.
    pub image_file_id: Option<String>,
    /// Declared type of an image document. Photos carry none.
    pub image_mime: Option<String>,
    pub button_labels: Vec<String>,
    /// Unix seconds.
    pub sent_at: i64,
}

impl ReportTarget {
    pub fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.trim().is_empty())
            || self.image_file_id.is_some()
    }
}

impl From<&Message> for ReportTarget {
    fn from(msg: &Message) -> Self {
        let sender = msg.from.as_ref().map(|user| Sender {
            id: user.id.0,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        });

        let button_labels = msg
            .reply_markup()
            .map(|markup| {
                markup
                    .inline_keyboard
                    .iter()
                    .flatten()
                    .map(|button| button.text.clone())
                    .collect()
            })
            .unwrap_or_default();

        let photo = msg
            .photo()
            .and_then(|sizes| sizes.last())
            .map(|photo| (photo.file.id.0.clone(), None));
        let image_document = msg.document().and_then(|doc| {
            doc.mime_type
                .as_ref()
                .filter(|mime| mime.type_() == "image")
                .map(|mime| (doc.file.id.0.clone(), Some(mime.essence_str().to_string())))
        });
        let (image_file_id, image_mime) = photo.or(image_document).unzip();

        Self {
            message_id: msg.id.0,
            sender,
            text: msg.text().or_else(|| msg.caption()).map(str::to_string),
            image_file_id,
            image_mime: image_mime.flatten(),
            button_labels,
            sent_at: msg.date.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Not a reply, or not in a group.
    Usage,
    NothingToAnalyze,
    NoRules,
    PredatesRules,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ExemptSender,
    UnknownSender,
    NoViolation,
}

/// Terminal state of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Aborted(AbortReason),
    ActionSkipped(SkipReason),
    /// `enforced` is false when deleting or muting failed.
    ActionTaken { enforced: bool },
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn message(extra: Value) -> Message {
        let mut value = json!({
            "message_id": 40,
            "date": 1700000100,
            "chat": { "id": -1001112223334i64, "type": "supergroup", "title": "Warden test" },
            "from": { "id": 4242, "is_bot": false, "first_name": "Spammer", "username": "spam_king" }
        });
        value
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_photo_post_from_telegram_json() {
        let msg = message(json!({
            "caption": "win now",
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 90 },
                { "file_id": "big", "file_unique_id": "b", "width": 1280, "height": 1280 }
            ],
            "reply_markup": {
                "inline_keyboard": [[{ "text": "Claim", "url": "https://claim.example" }]]
            }
        }));

        let target = ReportTarget::from(&msg);

        assert_eq!(
            target,
            ReportTarget {
                message_id: 40,
                sender: Some(Sender {
                    id: 4242,
                    first_name: "Spammer".to_string(),
                    username: Some("spam_king".to_string()),
                }),
                text: Some("win now".to_string()),
                image_file_id: Some("big".to_string()),
                image_mime: None,
                button_labels: vec!["Claim".to_string()],
                sent_at: 1700000100,
            }
        );
        assert!(target.has_content());
    }

    #[test]
    fn test_image_document_counts_as_image() {
        let msg = message(json!({
            "document": {
                "file_id": "doc-1",
                "file_unique_id": "d",
                "file_name": "prize.webp",
                "mime_type": "image/webp"
            }
        }));

        let target = ReportTarget::from(&msg);

        assert_eq!(target.text, None);
        assert_eq!(target.image_file_id.as_deref(), Some("doc-1"));
        assert_eq!(target.image_mime.as_deref(), Some("image/webp"));
        assert!(target.has_content());
    }

    #[test]
    fn test_other_documents_are_not_images() {
        let msg = message(json!({
            "document": {
                "file_id": "doc-2",
                "file_unique_id": "p",
                "file_name": "terms.pdf",
                "mime_type": "application/pdf"
            }
        }));

        let target = ReportTarget::from(&msg);

        assert_eq!(target.image_file_id, None);
        assert!(!target.has_content());
    }
}
