use std::sync::Arc;

use anyhow::Result;
use teloxide::Bot;
use warden_core::{
    ai::{Analyzer, InferenceClient},
    config::Config,
    rules::RulesStore,
    store::RedisStore,
};

use crate::platform::{ChatPlatform, TelegramPlatform};

#[derive(Clone)]
pub struct BotDependencies {
    pub platform: Arc<dyn ChatPlatform>,
    pub rules: RulesStore,
    pub analyzer: Arc<dyn Analyzer>,
    /// Without the leading `@`; used to match `/cmd@botname` addressing.
    pub bot_username: String,
}

impl BotDependencies {
    /// Connects to Redis and wires the production adapters around `bot`.
    pub async fn connect(config: &Config, bot: Bot, bot_username: String) -> Result<Self> {
        let store = RedisStore::connect(&config.redis_url).await?;
        let analyzer = InferenceClient::from_config(config)?;

        log::info!(
            "Dependencies ready (model: {}, endpoint: {})",
            config.inference_model,
            config.inference_url
        );

        Ok(Self {
            platform: Arc::new(TelegramPlatform::new(bot)),
            rules: RulesStore::new(Arc::new(store)),
            analyzer: Arc::new(analyzer),
            bot_username,
        })
    }
}
