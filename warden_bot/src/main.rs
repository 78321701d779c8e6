//! Long-polling runner for local development; production traffic arrives through warden_server.

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use warden_bot::{
    bot::handler_tree::handler_tree, dependencies::BotDependencies, platform::telegram::build_bot,
};
use warden_core::config::Config;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();
    log::info!("Starting warden_bot in polling mode...");

    let config = Config::from_env()?;
    let bot = build_bot(&config.bot_token)?;

    let me = bot.get_me().await?;
    let bot_username = me.username().to_string();

    // Polling and webhooks are mutually exclusive on the Telegram side.
    bot.delete_webhook().await?;

    let bot_deps = BotDependencies::connect(&config, bot.clone(), bot_username).await?;

    log::info!("Bot @{} ready", me.username());

    Dispatcher::builder(bot, handler_tree())
        .dependencies(dptree::deps![bot_deps, me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
