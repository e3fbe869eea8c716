use crate::moderation::ModAction;

/// A prefixed message split into a lowercased command name and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Returns `None` for messages that don't start with `prefix`. A bare prefix
/// parses to an empty command name.
pub fn parse_command(content: &str, prefix: &str) -> Option<ParsedCommand> {
    let rest = content.strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let args = words.map(str::to_string).collect();
    Some(ParsedCommand { name, args })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ping,
    Hi,
    TicTacToe,
    Moderation(ModAction),
    Unknown(String),
}

impl Command {
    pub fn from_parsed(parsed: &ParsedCommand) -> Self {
        match parsed.name.as_str() {
            "help" => Command::Help,
            "ping" => Command::Ping,
            "hi" => Command::Hi,
            "tictoe" => Command::TicTacToe,
            other => match ModAction::from_name(other) {
                Some(action) => Command::Moderation(action),
                None => Command::Unknown(other.to_string()),
            },
        }
    }
}

pub fn mention_greeting(prefix: &str) -> String {
    format!(
        "👋 Hello! My prefix is `{}`. Use `{}help` to see my commands.",
        prefix, prefix
    )
}

pub fn unknown_command_reply(prefix: &str) -> String {
    format!(
        "❓ Unknown command. Use `{}help` for the list of commands.",
        prefix
    )
}

pub const HI_REPLY: &str = "Hello 👋";
pub const PING_PLACEHOLDER: &str = "Pinging...";

/// `heartbeat_ms` is `None` until the shard has completed its first heartbeat.
pub fn pong_reply(latency_ms: u64, heartbeat_ms: Option<u64>) -> String {
    let heartbeat = heartbeat_ms.map_or_else(|| "n/a".to_string(), |ms| format!("{}ms", ms));
    format!("🏓 Pong! Latency: **{}ms** | WebSocket: **{}**", latency_ms, heartbeat)
}

/// Milliseconds between two Discord snowflakes.
pub fn snowflake_latency_ms(earlier: u64, later: u64) -> u64 {
    (later >> 22).saturating_sub(earlier >> 22)
}
