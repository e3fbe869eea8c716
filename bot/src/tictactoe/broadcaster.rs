use std::sync::Arc;

use reaper_common::engine::session::{SessionBroadcaster, SessionSnapshot};
use reaper_common::log;
use serenity::all::{EditMessage, Http};

use super::messages::GameMessages;
use super::render::{game_components, game_embed};

/// Rewrites the board message of a game that ended on its own.
#[derive(Clone)]
pub struct DiscordBroadcaster {
    http: Arc<Http>,
    messages: GameMessages,
}

impl DiscordBroadcaster {
    pub fn new(http: Arc<Http>, messages: GameMessages) -> Self {
        Self { http, messages }
    }
}

impl SessionBroadcaster for DiscordBroadcaster {
    async fn session_timed_out(&self, snapshot: SessionSnapshot) {
        let Some((channel, message)) = self.messages.forget(&snapshot.key).await else {
            log!("No board message for timed out session {}", snapshot.key);
            return;
        };
        let edit = EditMessage::new()
            .embed(game_embed(&snapshot))
            .components(game_components(&snapshot));
        if let Err(e) = channel.edit_message(&*self.http, message, edit).await {
            log!("Failed to update timed out session {}: {}", snapshot.key, e);
        }
    }
}
