use anyhow::Result;
use teloxide::types::Message;
use warden_core::helpers::bot_commands::{Command, RulesAction};

use super::handler::{handle_help, handle_rules, handle_unmute};
use crate::{bot::dto::CommandContext, dependencies::BotDependencies, report::handle_report};

pub async fn answers(msg: Message, cmd: Command, bot_deps: BotDependencies) -> Result<()> {
    let ctx = CommandContext::from(&msg);

    match cmd {
        Command::Help | Command::Start | Command::Bot => handle_help(&ctx, &bot_deps).await?,
        Command::Rules(args) => {
            handle_rules(&ctx, RulesAction::parse(&args), &bot_deps).await?;
        }
        Command::Unmute(args) => handle_unmute(&ctx, &args, &bot_deps).await?,
        Command::Report => {
            let outcome = handle_report(&ctx, &bot_deps).await;
            log::info!("Report in chat {} finished: {:?}", ctx.chat_id, outcome);
        }
    };

    Ok(())
}
