mod dto;
mod error;
mod info;
mod middlewares;
mod router;
mod state;
mod update;

use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use router::router;
use state::ServerState;
use teloxide::prelude::Requester;
use tokio::signal;
use warden_bot::{dependencies::BotDependencies, platform::telegram::build_bot};
use warden_core::config::Config;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let bot = build_bot(&config.bot_token)?;

    let me = bot.get_me().await?;
    let bot_deps = BotDependencies::connect(&config, bot, me.username().to_string()).await?;

    let state = Arc::new(ServerState::from((
        bot_deps,
        config.webhook_url.clone(),
        config.webhook_secret.clone(),
    )));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_domain).await?;

    log::info!("Webhook server for @{} listening on {}", me.username(), config.server_domain);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
