use std::env;

use crate::error::ConfigError;

pub const DEFAULT_INFERENCE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_INFERENCE_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_SERVER_DOMAIN: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub webhook_url: String,
    pub redis_url: String,
    pub inference_api_key: String,
    pub inference_url: String,
    pub inference_model: String,
    pub server_domain: String,
    pub webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            bot_token: require("TELEGRAM_BOT_TOKEN")?,
            webhook_url: require("WEBHOOK_URL")?,
            redis_url: require("REDIS_URL")?,
            inference_api_key: require("INFERENCE_API_KEY")?,
            inference_url: get("INFERENCE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            inference_model: get("INFERENCE_MODEL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string()),
            server_domain: get("SERVER_DOMAIN")
                .unwrap_or_else(|| DEFAULT_SERVER_DOMAIN.to_string()),
            webhook_secret: get("WEBHOOK_SECRET"),
        })
    }
}
