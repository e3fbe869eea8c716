use std::time::Duration;

use serenity::all::Permissions;

pub const DEFAULT_REASON: &str = "No reason provided";
pub const MAX_TIMEOUT: Duration = Duration::from_secs(28 * 24 * 60 * 60);
pub const MAX_SLOWMODE_SECS: u16 = 21_600;
pub const MAX_CLEAR_AMOUNT: u8 = 100;

/// Bulk deletes are refused by Discord for messages older than two weeks.
const BULK_DELETE_MAX_AGE_MS: u64 = 14 * 24 * 60 * 60 * 1000;
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModAction {
    Kick,
    Ban,
    Unban,
    Timeout,
    Clear,
    Slowmode,
}

impl ModAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kick" => Some(ModAction::Kick),
            "ban" => Some(ModAction::Ban),
            "unban" => Some(ModAction::Unban),
            "timeout" => Some(ModAction::Timeout),
            "clear" | "purge" => Some(ModAction::Clear),
            "slowmode" => Some(ModAction::Slowmode),
            _ => None,
        }
    }

    pub fn required_permissions(self) -> Permissions {
        match self {
            ModAction::Kick => Permissions::KICK_MEMBERS,
            ModAction::Ban | ModAction::Unban => Permissions::BAN_MEMBERS,
            ModAction::Timeout => Permissions::MODERATE_MEMBERS,
            ModAction::Clear => Permissions::MANAGE_MESSAGES,
            ModAction::Slowmode => Permissions::MANAGE_CHANNELS,
        }
    }

    pub fn denied_reply(self) -> &'static str {
        match self {
            ModAction::Kick => "🚫 You do not have permission to kick members.",
            ModAction::Ban => "🚫 You do not have permission to ban members.",
            ModAction::Unban => "🚫 You do not have permission to unban members.",
            ModAction::Timeout => "🚫 You do not have permission to time out members.",
            ModAction::Clear => "🚫 You do not have permission to delete messages.",
            ModAction::Slowmode => "🚫 You do not have permission to manage this channel.",
        }
    }

    pub fn is_allowed(self, granted: Permissions) -> bool {
        granted.contains(self.required_permissions())
    }
}

/// Joins the words after the first `skip` arguments, or the default reason.
pub fn reason_from(args: &[String], skip: usize) -> String {
    let reason = args.iter().skip(skip).cloned().collect::<Vec<_>>().join(" ");
    if reason.is_empty() {
        DEFAULT_REASON.to_string()
    } else {
        reason
    }
}

/// Parses `<amount><unit>` with unit `s`, `m`, `h` or `d` (any case).
/// Trailing junk after the leading digits is tolerated, a zero amount is not.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let unit = input.chars().last()?.to_ascii_lowercase();
    let body = &input[..input.len() - unit.len_utf8()];
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    let amount: u64 = digits.parse().ok()?;
    if amount == 0 {
        return None;
    }
    let unit_secs = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return None,
    };
    amount.checked_mul(unit_secs).map(Duration::from_secs)
}

pub fn parse_clear_amount(arg: Option<&str>) -> Option<u8> {
    let amount: u8 = arg?.parse().ok()?;
    (1..=MAX_CLEAR_AMOUNT).contains(&amount).then_some(amount)
}

pub fn parse_slowmode(arg: Option<&str>) -> Option<u16> {
    let secs: u16 = arg?.parse().ok()?;
    (secs <= MAX_SLOWMODE_SECS).then_some(secs)
}

/// A raw numeric user id. Zero is not a valid snowflake.
pub fn parse_user_id(arg: Option<&str>) -> Option<u64> {
    let arg = arg?;
    if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    arg.parse().ok().filter(|id| *id != 0)
}

pub fn snowflake_created_ms(id: u64) -> u64 {
    (id >> 22) + DISCORD_EPOCH_MS
}

/// Picks the `(message, author)` pairs to bulk delete: optionally one author
/// only, and never messages too old for bulk deletion.
pub fn purge_candidates(messages: &[(u64, u64)], author: Option<u64>, now_ms: u64) -> Vec<u64> {
    messages
        .iter()
        .filter(|(_, message_author)| author.is_none_or(|wanted| wanted == *message_author))
        .filter(|(id, _)| now_ms.saturating_sub(snowflake_created_ms(*id)) < BULK_DELETE_MAX_AGE_MS)
        .map(|(id, _)| *id)
        .collect()
}
