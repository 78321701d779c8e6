use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    ai::{
        Analyzer,
        dto::{
            ChatMessage, ChatRequest, ChatResponse, MessageContent, NO_RESPONSE_REASON,
            UNAVAILABLE_REASON, UserContent, Verdict,
        },
    },
    config::Config,
    error::InferenceError,
};

pub const INFERENCE_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_OUTPUT_TOKENS: u32 = 150;

/// Chat-completions client for an OpenAI-compatible vision endpoint.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl InferenceClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        Self::with_timeout(endpoint, api_key, model, INFERENCE_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .user_agent("warden-bot/1.0")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, InferenceError> {
        Self::new(
            config.inference_url.clone(),
            config.inference_api_key.clone(),
            config.inference_model.clone(),
        )
    }

    /// Sends one completion request. `Ok(None)` means the endpoint answered without content.
    pub async fn complete(
        &self,
        system_prompt: &str,
        content: &UserContent,
    ) -> Result<Option<String>, InferenceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::from(content),
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: 0.0,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;

        Ok(parsed.into_text())
    }
}

#[async_trait]
impl Analyzer for InferenceClient {
    async fn analyze(&self, system_prompt: &str, content: &UserContent) -> Verdict {
        match self.complete(system_prompt, content).await {
            Ok(Some(text)) => {
                let verdict = Verdict::from_response(&text);
                log::info!(
                    "Inference verdict: violates={} reason={}",
                    verdict.violates,
                    verdict.reason
                );
                verdict
            }
            Ok(None) => {
                log::warn!("Inference endpoint returned no content");
                Verdict::clean(NO_RESPONSE_REASON)
            }
            Err(e) => {
                log::error!("Inference request failed: {}", e);
                Verdict::clean(UNAVAILABLE_REASON)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;
    use crate::ai::dto::InlineImage;

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    async fn client_for(server: &MockServer) -> InferenceClient {
        InferenceClient::new(
            format!("{}/v1/chat/completions", server.uri()),
            "sk-test",
            "vision-model",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_violation_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "vision-model",
                "max_tokens": 150,
                "temperature": 0.0,
                "messages": [
                    { "role": "system", "content": "rules prompt" },
                    { "role": "user", "content": "buy now at http://spam.example" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("YES\nContains a prohibited link")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .await
            .analyze(
                "rules prompt",
                &UserContent::text("buy now at http://spam.example"),
            )
            .await;

        assert_eq!(
            verdict,
            Verdict {
                violates: true,
                reason: "Contains a prohibited link".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_lowercase_no_is_clean() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("no\nfine")))
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .await
            .analyze("prompt", &UserContent::text("hello"))
            .await;

        assert_eq!(verdict, Verdict::clean("fine"));
    }

    #[tokio::test]
    async fn test_image_is_sent_inline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("NO\nharmless")))
            .mount(&server)
            .await;

        let content = UserContent::text("caption")
            .with_image(InlineImage::new("image/jpeg", vec![1, 2, 3]));
        client_for(&server).await.analyze("prompt", &content).await;

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        let url = body["messages"][1]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();

        assert_eq!(url, "data:image/jpeg;base64,AQID");
    }

    #[tokio::test]
    async fn test_empty_body_is_no_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .await
            .analyze("prompt", &UserContent::text("hello"))
            .await;

        assert_eq!(verdict, Verdict::clean(NO_RESPONSE_REASON));
    }

    #[tokio::test]
    async fn test_missing_content_is_no_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .await
            .analyze("prompt", &UserContent::text("hello"))
            .await;

        assert_eq!(verdict, Verdict::clean(NO_RESPONSE_REASON));
    }

    #[tokio::test]
    async fn test_http_error_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .complete("prompt", &UserContent::text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 500, .. }));

        let verdict = client.analyze("prompt", &UserContent::text("hello")).await;
        assert_eq!(verdict, Verdict::clean(UNAVAILABLE_REASON));
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("YES\ntoo late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = InferenceClient::with_timeout(
            format!("{}/v1/chat/completions", server.uri()),
            "sk-test",
            "vision-model",
            Duration::from_millis(200),
        )
        .unwrap();

        let verdict = client.analyze("prompt", &UserContent::text("hello")).await;

        assert_eq!(verdict, Verdict::clean(UNAVAILABLE_REASON));
    }
}
