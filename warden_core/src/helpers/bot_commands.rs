use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Display this text.")]
    Help,
    #[command(hide)]
    Start,
    #[command(hide)]
    Bot,
    #[command(
        description = "Show the group rules. Admins: /rules set <text> to replace them, /rules reset to remove them."
    )]
    Rules(String),
    #[command(description = "Lift a mute (admins only), e.g. /unmute 123456789.")]
    Unmute(String),
    #[command(
        description = "Reply to a message with /report to check it against the group rules. Violations are deleted and the sender is muted."
    )]
    Report,
}

/// Parsed argument of `/rules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesAction {
    Show,
    Set(String),
    Reset,
    Invalid,
}

impl RulesAction {
    pub fn parse(args: &str) -> Self {
        let args = args.trim();
        let (subcommand, rest) = match args.split_once(char::is_whitespace) {
            Some((subcommand, rest)) => (subcommand, rest.trim()),
            None => (args, ""),
        };

        match subcommand.to_lowercase().as_str() {
            "" | "show" if rest.is_empty() => RulesAction::Show,
            "set" => RulesAction::Set(rest.to_string()),
            "reset" if rest.is_empty() => RulesAction::Reset,
            _ => RulesAction::Invalid,
        }
    }
}

/// Parses the `/unmute` argument into a user id.
pub fn parse_user_id(args: &str) -> Option<u64> {
    let args = args.trim();
    if args.is_empty() || args.contains(char::is_whitespace) {
        return None;
    }
    args.parse::<u64>().ok()
}
