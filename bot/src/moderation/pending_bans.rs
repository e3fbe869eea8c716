use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reaper_common::log;
use serenity::all::{ChannelId, EditMessage, GuildId, Http, MessageId, UserId};
use tokio::sync::Mutex;

pub const CONFIRM_BAN_ID: &str = "confirm_ban";
pub const CANCEL_BAN_ID: &str = "cancel_ban";
pub const BAN_CONFIRM_WINDOW: Duration = Duration::from_secs(15);
pub const BAN_TIMED_OUT: &str = "Confirmation timed out. Ban cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanDecision {
    Confirm,
    Cancel,
}

impl BanDecision {
    pub fn parse(custom_id: &str) -> Option<Self> {
        match custom_id {
            CONFIRM_BAN_ID => Some(BanDecision::Confirm),
            CANCEL_BAN_ID => Some(BanDecision::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBan {
    pub guild: GuildId,
    pub moderator: UserId,
    pub target: UserId,
    pub target_tag: String,
    pub reason: String,
}

/// Ban confirmations waiting on the moderator who asked for them.
#[derive(Clone, Default)]
pub struct PendingBans {
    pending: Arc<Mutex<HashMap<MessageId, PendingBan>>>,
}

impl PendingBans {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, message: MessageId, ban: PendingBan) {
        self.pending.lock().await.insert(message, ban);
    }

    /// Takes the pending ban if `clicker` is the moderator who requested it.
    pub async fn claim(&self, message: MessageId, clicker: UserId) -> Option<PendingBan> {
        let mut pending = self.pending.lock().await;
        if pending.get(&message)?.moderator != clicker {
            return None;
        }
        pending.remove(&message)
    }

    pub fn expire_after(&self, http: Arc<Http>, channel: ChannelId, message: MessageId) {
        let bans = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(BAN_CONFIRM_WINDOW).await;
            if bans.pending.lock().await.remove(&message).is_none() {
                return;
            }
            let edit = EditMessage::new()
                .content(BAN_TIMED_OUT)
                .embeds(Vec::new())
                .components(Vec::new());
            if let Err(e) = channel.edit_message(&*http, message, edit).await {
                log!("Failed to expire ban confirmation {}: {}", message, e);
            }
        });
    }
}
