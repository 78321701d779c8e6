use warden_bot::dependencies::BotDependencies;

#[derive(Clone)]
pub struct ServerState {
    bot_deps: BotDependencies,
    webhook_url: String,
    webhook_secret: Option<String>,
}

impl From<(BotDependencies, String, Option<String>)> for ServerState {
    fn from(states: (BotDependencies, String, Option<String>)) -> Self {
        let (bot_deps, webhook_url, webhook_secret) = states;
        Self {
            bot_deps,
            webhook_url,
            webhook_secret,
        }
    }
}

impl ServerState {
    pub fn bot_deps(&self) -> BotDependencies {
        self.bot_deps.clone()
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }
}
