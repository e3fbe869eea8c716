use std::collections::HashMap;
use std::sync::Arc;

use reaper_common::SessionKey;
use serenity::all::{ChannelId, MessageId};
use tokio::sync::Mutex;

#[derive(Default)]
struct MessageIndex {
    by_message: HashMap<MessageId, SessionKey>,
    by_key: HashMap<SessionKey, (ChannelId, MessageId)>,
}

/// Links each running game to the Discord message that shows its board.
#[derive(Clone, Default)]
pub struct GameMessages {
    index: Arc<Mutex<MessageIndex>>,
}

impl GameMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn track(&self, key: SessionKey, channel: ChannelId, message: MessageId) {
        let mut index = self.index.lock().await;
        if let Some((_, previous)) = index.by_key.insert(key.clone(), (channel, message)) {
            index.by_message.remove(&previous);
        }
        index.by_message.insert(message, key);
    }

    pub async fn key_for(&self, message: MessageId) -> Option<SessionKey> {
        self.index.lock().await.by_message.get(&message).cloned()
    }

    /// Drops the link and returns where the board was shown.
    pub async fn forget(&self, key: &SessionKey) -> Option<(ChannelId, MessageId)> {
        let mut index = self.index.lock().await;
        let location = index.by_key.remove(key)?;
        index.by_message.remove(&location.1);
        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey::new("1_111_bot")
    }

    #[tokio::test]
    async fn test_track_and_forget() {
        let messages = GameMessages::new();
        let channel = ChannelId::new(1);
        let message = MessageId::new(500);

        messages.track(key(), channel, message).await;
        assert_eq!(messages.key_for(message).await, Some(key()));

        assert_eq!(messages.forget(&key()).await, Some((channel, message)));
        assert_eq!(messages.key_for(message).await, None);
        assert_eq!(messages.forget(&key()).await, None);
    }

    #[tokio::test]
    async fn test_retracking_key_drops_old_message() {
        let messages = GameMessages::new();
        let channel = ChannelId::new(1);

        messages.track(key(), channel, MessageId::new(500)).await;
        messages.track(key(), channel, MessageId::new(501)).await;

        assert_eq!(messages.key_for(MessageId::new(500)).await, None);
        assert_eq!(messages.key_for(MessageId::new(501)).await, Some(key()));
        assert_eq!(messages.forget(&key()).await, Some((channel, MessageId::new(501))));
    }
}
