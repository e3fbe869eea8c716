use crate::games::tictactoe::Participant;
use crate::{ChannelId, ParticipantId, SessionKey};

const AUTOMATED_KEY_PART: &str = "bot";

impl SessionKey {
    /// Games against the bot are keyed by channel and challenger. Games
    /// between two players use the sorted pair, so a reversed challenge in
    /// the same channel collides with the running one.
    pub fn derive(channel: &ChannelId, first: &ParticipantId, opponent: &Participant) -> Self {
        match opponent {
            Participant::Automated => {
                SessionKey::new(format!("{}_{}_{}", channel, first, AUTOMATED_KEY_PART))
            }
            Participant::Player(second) => {
                let (low, high) = if first <= second {
                    (first, second)
                } else {
                    (second, first)
                };
                SessionKey::new(format!("{}_{}_{}", channel, low, high))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_game_key_includes_challenger() {
        let key = SessionKey::derive(
            &ChannelId::new("100"),
            &ParticipantId::new("7"),
            &Participant::Automated,
        );
        assert_eq!(key.as_str(), "100_7_bot");
    }

    #[test]
    fn test_player_game_key_is_order_independent() {
        let channel = ChannelId::new("100");
        let a = ParticipantId::new("11");
        let b = ParticipantId::new("22");
        let forward = SessionKey::derive(&channel, &a, &Participant::Player(b.clone()));
        let reverse = SessionKey::derive(&channel, &b, &Participant::Player(a));
        assert_eq!(forward, reverse);
        assert_eq!(forward.as_str(), "100_11_22");
    }

    #[test]
    fn test_keys_differ_per_channel_and_mode() {
        let a = ParticipantId::new("11");
        let b = Participant::Player(ParticipantId::new("22"));
        let first = SessionKey::derive(&ChannelId::new("1"), &a, &b);
        let second = SessionKey::derive(&ChannelId::new("2"), &a, &b);
        let bot = SessionKey::derive(&ChannelId::new("1"), &a, &Participant::Automated);
        assert_ne!(first, second);
        assert_ne!(first, bot);
    }
}
