use teloxide::utils::html;
use warden_core::ai::{
    dto::{InlineImage, UserContent, Verdict},
    prompt::build_prompt,
};

use crate::{
    bot::dto::CommandContext,
    dependencies::BotDependencies,
    middleware::auth::is_exempt,
    platform::dto::Restriction,
    report::dto::{AbortReason, ReportOutcome, ReportTarget, SkipReason},
    utils::{image_mime_type, send_reply, user_mention},
};

const USAGE_MESSAGE: &str = "❌ <b>Invalid Usage</b>\n\n📝 Reply to a message in a group with <code>/report</code> to check it against the group rules.";
const NOTHING_TO_ANALYZE_MESSAGE: &str =
    "⚠️ The reported message has no text, caption or image to analyze.";
const UNKNOWN_SENDER_MESSAGE: &str =
    "⚠️ Could not identify who sent this message, so no action can be taken.";
const EXEMPT_MESSAGE: &str =
    "ℹ️ This message was sent by a group admin and is exempt from moderation.";
const NO_RULES_MESSAGE: &str = "📋 No rules are configured for this group.\n\nAdmins can add them with <code>/rules set &lt;rules&gt;</code>.";
const PREDATES_RULES_MESSAGE: &str =
    "🕰️ This message was sent before the current rules were set and cannot be judged against them.";
const ANALYZING_MESSAGE: &str = "🔍 Analyzing the reported message...";
const FAILURE_MESSAGE: &str = "❌ Analysis failed. Please try again later.";

/// Runs `/report` for the message `ctx` replies to and returns where the workflow ended.
///
/// Platform failures never escape: every user-facing step degrades to a logged
/// error, and enforcement failures are reported in the chat.
pub async fn handle_report(ctx: &CommandContext, deps: &BotDependencies) -> ReportOutcome {
    let chat_id = ctx.chat_id;
    let platform = deps.platform.as_ref();
    let reply = |text: &'static str| send_reply(platform, chat_id, text, Some(ctx.message_id));

    let target = match (&ctx.reply_to, ctx.is_group) {
        (Some(target), true) => target,
        _ => {
            reply(USAGE_MESSAGE).await;
            return ReportOutcome::Aborted(AbortReason::Usage);
        }
    };

    if !target.has_content() {
        reply(NOTHING_TO_ANALYZE_MESSAGE).await;
        return ReportOutcome::Aborted(AbortReason::NothingToAnalyze);
    }

    let Some(sender) = &target.sender else {
        log::info!(
            "Report in chat {} skipped: message {} has no sender",
            chat_id,
            target.message_id
        );
        reply(UNKNOWN_SENDER_MESSAGE).await;
        return ReportOutcome::ActionSkipped(SkipReason::UnknownSender);
    };

    if is_exempt(platform, chat_id, sender.id).await {
        log::info!(
            "Report in chat {} skipped: sender {} is exempt",
            chat_id,
            sender.id
        );
        reply(EXEMPT_MESSAGE).await;
        return ReportOutcome::ActionSkipped(SkipReason::ExemptSender);
    }

    let Some(rules) = deps.rules.group_rules(chat_id).await else {
        reply(NO_RULES_MESSAGE).await;
        return ReportOutcome::Aborted(AbortReason::NoRules);
    };

    if rules
        .created_at
        .is_some_and(|created_at| target.sent_at < created_at)
    {
        log::info!(
            "Report in chat {} aborted: message {} predates the rules",
            chat_id,
            target.message_id
        );
        reply(PREDATES_RULES_MESSAGE).await;
        return ReportOutcome::Aborted(AbortReason::PredatesRules);
    }

    let status_id = reply(ANALYZING_MESSAGE).await;

    let content = match build_content(target, deps).await {
        Ok(content) => content,
        Err(e) => {
            log::error!(
                "Failed to prepare report of message {} in chat {}: {}",
                target.message_id,
                chat_id,
                e
            );
            publish(deps, ctx, status_id, FAILURE_MESSAGE).await;
            return ReportOutcome::Aborted(AbortReason::Failed);
        }
    };

    let verdict = deps
        .analyzer
        .analyze(&build_prompt(&rules.text), &content)
        .await;

    publish(deps, ctx, status_id, &verdict_message(&verdict)).await;

    if !verdict.violates {
        return ReportOutcome::ActionSkipped(SkipReason::NoViolation);
    }

    let deleted = deps
        .platform
        .delete_message(chat_id, target.message_id)
        .await
        .inspect_err(|e| {
            log::error!(
                "Failed to delete message {} in chat {}: {}",
                target.message_id,
                chat_id,
                e
            )
        })
        .is_ok();

    let muted = deps
        .platform
        .restrict_member(chat_id, sender.id, Restriction::Mute)
        .await
        .is_ok();

    let mention = user_mention(sender);
    let announcement = match (deleted, muted) {
        (true, true) => format!(
            "🔇 Message deleted and {} has been muted.\n\n💡 Admins can lift the mute with <code>/unmute {}</code>.",
            mention, sender.id
        ),
        (false, true) => format!(
            "🔇 {} has been muted, but the message could not be deleted. Make sure the bot is allowed to delete messages.\n\n💡 Admins can lift the mute with <code>/unmute {}</code>.",
            mention, sender.id
        ),
        (true, false) => format!(
            "🗑️ Message deleted, but {} could not be muted. Make sure the bot is allowed to restrict members.",
            mention
        ),
        (false, false) => format!(
            "⚠️ The message from {} violates the rules, but the bot could not delete it or mute the sender. Make sure the bot is an admin with those permissions.",
            mention
        ),
    };

    reply_to_command(deps, ctx, &announcement).await;

    log::info!(
        "Report in chat {}: message {} from {} violated the rules (deleted: {}, muted: {})",
        chat_id,
        target.message_id,
        sender.id,
        deleted,
        muted
    );

    ReportOutcome::ActionTaken {
        enforced: deleted && muted,
    }
}

/// Text, button labels and the downloaded image of the reported message.
async fn build_content(
    target: &ReportTarget,
    deps: &BotDependencies,
) -> anyhow::Result<UserContent> {
    let mut parts = Vec::new();

    if let Some(text) = target
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        parts.push(text.to_string());
    }

    if !target.button_labels.is_empty() {
        parts.push(format!(
            "The message has buttons labeled: {}",
            target.button_labels.join(", ")
        ));
    }

    let Some(file_id) = &target.image_file_id else {
        return Ok(UserContent::text(parts.join("\n\n")));
    };

    parts.push("The message contains the attached image.".to_string());

    let file = deps.platform.download_file(file_id).await?;
    let mime_type = target
        .image_mime
        .clone()
        .unwrap_or_else(|| image_mime_type(&file.path).to_string());
    let image = InlineImage::new(mime_type, file.data);

    Ok(UserContent::text(parts.join("\n\n")).with_image(image))
}

fn verdict_message(verdict: &Verdict) -> String {
    let reason = match verdict.reason.trim() {
        "" => "no reason given".to_string(),
        reason => html::escape(reason),
    };

    if verdict.violates {
        format!("🚨 <b>Rule violation detected</b>\n\n<b>Reason:</b> {}", reason)
    } else {
        format!("✅ <b>No violation found</b>\n\n<b>Reason:</b> {}", reason)
    }
}

/// Replaces the status message, or posts `text` fresh when there is none or it cannot be edited.
async fn publish(deps: &BotDependencies, ctx: &CommandContext, status_id: Option<i32>, text: &str) {
    if let Some(message_id) = status_id {
        match deps
            .platform
            .edit_message(ctx.chat_id, message_id, text)
            .await
        {
            Ok(()) => return,
            Err(e) => log::warn!(
                "Failed to edit status message {} in chat {}: {}",
                message_id,
                ctx.chat_id,
                e
            ),
        }
    }

    reply_to_command(deps, ctx, text).await;
}

async fn reply_to_command(deps: &BotDependencies, ctx: &CommandContext, text: &str) {
    send_reply(deps.platform.as_ref(), ctx.chat_id, text, Some(ctx.message_id)).await;
}
