use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<&str> for MessageResponse {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    #[serde(rename = "setWebhook")]
    pub set_webhook: Option<String>,
}

impl InfoQuery {
    pub fn wants_webhook(&self) -> bool {
        self.set_webhook.as_deref() == Some("true")
    }
}
