use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reaper_common::log;
use serenity::all::{
    ChannelId, CreateActionRow, CreateEmbed, CreateEmbedFooter, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EditMessage, Http, MessageId, Timestamp, UserId,
};
use tokio::sync::Mutex;

pub const HELP_SELECT_ID: &str = "help_select";
pub const HELP_TIMED_OUT: &str = "⏰ Help menu timed out.";

const HELP_COLOUR: u32 = 0x5865F2;
const HELP_FOOTER: &str = "Created by Reaper 🧠 | Interactive Help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpCategory {
    Moderation,
    Games,
    General,
}

impl HelpCategory {
    pub const ALL: [HelpCategory; 3] = [
        HelpCategory::Moderation,
        HelpCategory::Games,
        HelpCategory::General,
    ];

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "moderation" => Some(HelpCategory::Moderation),
            "games" => Some(HelpCategory::Games),
            "general" => Some(HelpCategory::General),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            HelpCategory::Moderation => "moderation",
            HelpCategory::Games => "games",
            HelpCategory::General => "general",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HelpCategory::Moderation => "🛡️ Moderation",
            HelpCategory::Games => "🎯 Games",
            HelpCategory::General => "🤖 General",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            HelpCategory::Moderation => "Kick, ban, timeout, and more moderation tools",
            HelpCategory::Games => "Fun games like Tic-Tac-Toe",
            HelpCategory::General => "Simple fun commands and bot info",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HelpCategory::Moderation => "📜 Moderation Commands",
            HelpCategory::Games => "📜 Games Commands",
            HelpCategory::General => "📜 General Commands",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            HelpCategory::Moderation => "Here are the advanced moderation commands:",
            HelpCategory::Games => "Dive into some fun games:",
            HelpCategory::General => "General bot commands:",
        }
    }

    /// Command usage and explanation pairs shown for the category.
    pub fn entries(self, prefix: &str) -> Vec<(String, String)> {
        let usage = |command: &str| format!("`{}{}`", prefix, command);
        match self {
            HelpCategory::Moderation => vec![
                (usage("kick @user [reason]"), "Kick a user from the server".to_string()),
                (usage("ban @user [reason]"), "Ban a user (with confirmation)".to_string()),
                (usage("unban <userID>"), "Unban a user by ID".to_string()),
                (
                    usage("timeout @user <duration> [reason]"),
                    "Timeout a user (e.g., 10m, 1h)".to_string(),
                ),
                (usage("clear <amount> [@user]"), "Delete up to 100 messages".to_string()),
                (usage("slowmode <seconds>"), "Set slowmode for the channel".to_string()),
            ],
            HelpCategory::Games => vec![(
                usage("tictoe [@user]"),
                "Challenge a friend or the bot to Tic-Tac-Toe".to_string(),
            )],
            HelpCategory::General => vec![
                (usage("ping"), "Check bot latency".to_string()),
                (usage("hi"), "Get a friendly greeting".to_string()),
                (usage("help"), "Show this help menu".to_string()),
            ],
        }
    }
}

pub fn menu_embed() -> CreateEmbed {
    CreateEmbed::new()
        .colour(HELP_COLOUR)
        .title("📜 Help Menu")
        .description("Select a category below to view the available commands:")
        .footer(CreateEmbedFooter::new(HELP_FOOTER))
        .timestamp(Timestamp::now())
}

pub fn category_embed(category: HelpCategory, prefix: &str) -> CreateEmbed {
    let fields = category
        .entries(prefix)
        .into_iter()
        .map(|(name, value)| (name, value, false));
    CreateEmbed::new()
        .colour(HELP_COLOUR)
        .title(category.title())
        .description(category.description())
        .fields(fields)
        .footer(CreateEmbedFooter::new(HELP_FOOTER))
        .timestamp(Timestamp::now())
}

pub fn menu_components() -> Vec<CreateActionRow> {
    let options = HelpCategory::ALL
        .iter()
        .map(|category| {
            CreateSelectMenuOption::new(category.label(), category.value())
                .description(category.summary())
        })
        .collect();
    let menu = CreateSelectMenu::new(HELP_SELECT_ID, CreateSelectMenuKind::String { options })
        .placeholder("Choose a category...");
    vec![CreateActionRow::SelectMenu(menu)]
}

/// Open help menus keyed by message, each owned by the user who asked for it.
#[derive(Clone, Default)]
pub struct HelpMenus {
    owners: Arc<Mutex<HashMap<MessageId, UserId>>>,
}

impl HelpMenus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, message: MessageId, owner: UserId) {
        self.owners.lock().await.insert(message, owner);
    }

    /// `None` when the message is not an open help menu.
    pub async fn owner_of(&self, message: MessageId) -> Option<UserId> {
        self.owners.lock().await.get(&message).copied()
    }

    pub async fn close(&self, message: MessageId) -> bool {
        self.owners.lock().await.remove(&message).is_some()
    }

    /// Closes the menu after `timeout` and replaces it with the timed-out notice.
    pub fn expire_after(&self, http: Arc<Http>, channel: ChannelId, message: MessageId, timeout: Duration) {
        let menus = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if !menus.close(message).await {
                return;
            }
            let edit = EditMessage::new()
                .content(HELP_TIMED_OUT)
                .embeds(Vec::new())
                .components(Vec::new());
            if let Err(e) = channel.edit_message(&*http, message, edit).await {
                log!("Failed to expire help menu {}: {}", message, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_values_round_trip() {
        for category in HelpCategory::ALL {
            assert_eq!(HelpCategory::from_value(category.value()), Some(category));
        }
        assert_eq!(HelpCategory::from_value("economy"), None);
        assert_eq!(HelpCategory::from_value("moderation"), Some(HelpCategory::Moderation));
    }

    #[test]
    fn test_entries_use_prefix() {
        let games = HelpCategory::Games.entries("?");
        assert_eq!(games[0].0, "`?tictoe [@user]`");

        let general = HelpCategory::General.entries("!");
        let names: Vec<&str> = general.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["`!ping`", "`!hi`", "`!help`"]);

        let moderation = HelpCategory::Moderation.entries("!");
        assert_eq!(moderation.len(), 6);
        assert_eq!(moderation[0].0, "`!kick @user [reason]`");
    }

    #[tokio::test]
    async fn test_menus_track_owner_until_closed() {
        let menus = HelpMenus::new();
        let message = MessageId::new(10);
        let owner = UserId::new(20);

        menus.open(message, owner).await;
        assert_eq!(menus.owner_of(message).await, Some(owner));

        assert!(menus.close(message).await);
        assert!(!menus.close(message).await);
        assert_eq!(menus.owner_of(message).await, None);
    }
}
