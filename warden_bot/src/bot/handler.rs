use anyhow::Result;
use teloxide::{
    types::{Message, Update, UpdateKind},
    utils::{command::BotCommands, html},
};
use warden_core::{
    error::SetRulesError,
    helpers::bot_commands::{Command, RulesAction, parse_user_id},
};

use crate::{
    bot::{answers::answers, dto::CommandContext},
    dependencies::BotDependencies,
    middleware::auth::is_exempt,
    platform::dto::Restriction,
    utils::{MESSAGE_LIMIT, escape_within, format_timestamp, send_reply},
};

pub const GROUP_ONLY_MESSAGE: &str = "❌ This command can only be used in a group.";
pub const ADMIN_ONLY_MESSAGE: &str = "❌ Only group admins can use this command.";
pub const RULES_USAGE_MESSAGE: &str = "❌ <b>Invalid Usage</b>\n\n<code>/rules</code> or <code>/rules show</code> - show the rules\n<code>/rules set &lt;rules&gt;</code> - replace the rules (admins)\n<code>/rules reset</code> - remove the rules (admins)";
pub const UNMUTE_USAGE_MESSAGE: &str =
    "❌ <b>Invalid Usage</b>\n\nUse <code>/unmute &lt;user_id&gt;</code>, e.g. <code>/unmute 123456789</code>.";
const NO_RULES_MESSAGE: &str = "📋 No rules are configured for this group yet.";

/// Room left for headers and footers around echoed text.
const ECHO_LIMIT: usize = MESSAGE_LIMIT - 256;

/// Entry point for webhook updates. Only messages are handled.
pub async fn handle_update(update: Update, bot_deps: BotDependencies) -> Result<()> {
    match update.kind {
        UpdateKind::Message(msg) => handle_message(msg, bot_deps).await,
        _ => Ok(()),
    }
}

/// Routes a message to its command handler. Plain text and unknown commands are ignored.
pub async fn handle_message(msg: Message, bot_deps: BotDependencies) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match Command::parse(text, &bot_deps.bot_username) {
        Ok(cmd) => answers(msg, cmd, bot_deps).await,
        Err(_) => Ok(()),
    }
}

pub async fn handle_help(ctx: &CommandContext, bot_deps: &BotDependencies) -> Result<()> {
    let help = html::escape(&Command::descriptions().to_string());

    send_reply(bot_deps.platform.as_ref(), ctx.chat_id, &help, Some(ctx.message_id)).await;

    Ok(())
}

pub async fn handle_rules(
    ctx: &CommandContext,
    action: RulesAction,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let platform = bot_deps.platform.as_ref();

    if !ctx.is_group {
        send_reply(platform, ctx.chat_id, GROUP_ONLY_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    }

    if action == RulesAction::Invalid {
        send_reply(platform, ctx.chat_id, RULES_USAGE_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    }

    if action != RulesAction::Show && !is_admin(ctx, bot_deps).await {
        log::info!(
            "Rejected /rules change in chat {} from {:?}",
            ctx.chat_id,
            ctx.sender_id
        );
        send_reply(platform, ctx.chat_id, ADMIN_ONLY_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    }

    let reply = match action {
        RulesAction::Show => match bot_deps.rules.group_rules(ctx.chat_id).await {
            Some(rules) => {
                let created = rules
                    .created_at
                    .map(|ts| format!("\n\n🕒 Set on {}", format_timestamp(ts)))
                    .unwrap_or_default();
                format!(
                    "📋 <b>Group Rules</b>\n\n{}{}",
                    escape_within(&rules.text, ECHO_LIMIT),
                    created
                )
            }
            None => NO_RULES_MESSAGE.to_string(),
        },
        RulesAction::Set(text) => match bot_deps.rules.set_rules(ctx.chat_id, &text).await {
            Ok(prompt) => format!(
                "✅ <b>Rules updated</b>\n\nReports will be checked with this prompt:\n<pre>{}</pre>",
                escape_within(&prompt, ECHO_LIMIT)
            ),
            Err(SetRulesError::TooShort { len, min }) => format!(
                "❌ Rules must be at least {} characters long (got {}). The current rules were not changed.",
                min, len
            ),
            Err(SetRulesError::Store(_)) => {
                "❌ Failed to save the rules. Please try again later.".to_string()
            }
        },
        RulesAction::Reset => match bot_deps.rules.reset_rules(ctx.chat_id).await {
            Ok(()) => "🗑️ Rules removed. <code>/report</code> is disabled until new rules are set."
                .to_string(),
            Err(_) => "❌ Failed to reset the rules. Please try again later.".to_string(),
        },
        RulesAction::Invalid => RULES_USAGE_MESSAGE.to_string(),
    };

    send_reply(platform, ctx.chat_id, &reply, Some(ctx.message_id)).await;

    Ok(())
}

pub async fn handle_unmute(
    ctx: &CommandContext,
    args: &str,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let platform = bot_deps.platform.as_ref();

    if !ctx.is_group {
        send_reply(platform, ctx.chat_id, GROUP_ONLY_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    }

    let Some(user_id) = parse_user_id(args) else {
        send_reply(platform, ctx.chat_id, UNMUTE_USAGE_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    };

    if !is_admin(ctx, bot_deps).await {
        log::info!(
            "Rejected /unmute of {} in chat {} from {:?}",
            user_id,
            ctx.chat_id,
            ctx.sender_id
        );
        send_reply(platform, ctx.chat_id, ADMIN_ONLY_MESSAGE, Some(ctx.message_id)).await;
        return Ok(());
    }

    let reply = match platform
        .restrict_member(ctx.chat_id, user_id, Restriction::Lift)
        .await
    {
        Ok(()) => format!("🔊 User <code>{}</code> has been unmuted.", user_id),
        Err(_) => format!(
            "❌ Failed to unmute user <code>{}</code>. Make sure the bot is an admin allowed to restrict members.",
            user_id
        ),
    };

    send_reply(platform, ctx.chat_id, &reply, Some(ctx.message_id)).await;

    Ok(())
}

async fn is_admin(ctx: &CommandContext, bot_deps: &BotDependencies) -> bool {
    match ctx.sender_id {
        Some(user_id) => is_exempt(bot_deps.platform.as_ref(), ctx.chat_id, user_id).await,
        None => false,
    }
}
