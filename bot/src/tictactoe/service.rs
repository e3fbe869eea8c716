use reaper_common::engine::session::{MoveOutcome, SessionHandle, SessionSnapshot, StartOutcome, StopOutcome};
use reaper_common::games::tictactoe::Participant;
use reaper_common::{ChannelId as ChannelScope, ParticipantId, SessionKey, log};
use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage, Message,
};

use super::messages::GameMessages;
use super::render::{GameButton, game_components, game_embed};

pub const INVALID_OPPONENT_REPLY: &str = "You can't play against yourself or other bots!";
pub const ALREADY_RUNNING_REPLY: &str = "⚠️ You already have a game running in this channel!";

/// Picks the second seat for a challenge. `None` means the challenge is refused.
pub fn opponent_for(
    challenger: &ParticipantId,
    mentioned: Option<(ParticipantId, bool)>,
) -> Option<Participant> {
    match mentioned {
        None => Some(Participant::Automated),
        Some((id, is_bot)) if is_bot || id == *challenger => None,
        Some((id, _)) => Some(Participant::Player(id)),
    }
}

#[derive(Clone)]
pub struct TicTacToeService {
    sessions: SessionHandle,
    messages: GameMessages,
}

impl TicTacToeService {
    pub fn new(sessions: SessionHandle, messages: GameMessages) -> Self {
        Self { sessions, messages }
    }

    pub async fn start_from_message(&self, ctx: &Context, msg: &Message) -> serenity::Result<()> {
        let challenger = ParticipantId::new(msg.author.id.to_string());
        let mentioned = msg
            .mentions
            .first()
            .map(|user| (ParticipantId::new(user.id.to_string()), user.bot));
        let Some(opponent) = opponent_for(&challenger, mentioned) else {
            msg.reply(&ctx.http, INVALID_OPPONENT_REPLY).await?;
            return Ok(());
        };

        let scope = ChannelScope::new(msg.channel_id.to_string());
        let key = SessionKey::derive(&scope, &challenger, &opponent);
        let outcome = match self.sessions.start_session(key, challenger, opponent).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log!("Could not start tic-tac-toe: {}", e);
                return Ok(());
            }
        };

        match outcome {
            StartOutcome::AlreadyActive => {
                msg.reply(&ctx.http, ALREADY_RUNNING_REPLY).await?;
            }
            StartOutcome::Started(snapshot) => {
                let board = CreateMessage::new()
                    .embed(game_embed(&snapshot))
                    .components(game_components(&snapshot));
                let sent = msg.channel_id.send_message(&ctx.http, board).await?;
                self.messages.track(snapshot.key, msg.channel_id, sent.id).await;
            }
        }
        Ok(())
    }

    /// Applies a board button press. Presses that change nothing are acknowledged silently.
    pub async fn handle_button(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        button: GameButton,
    ) -> serenity::Result<()> {
        let snapshot = match self.messages.key_for(component.message.id).await {
            Some(key) => {
                let actor = ParticipantId::new(component.user.id.to_string());
                self.apply(key, actor, button).await
            }
            None => None,
        };

        let response = match snapshot {
            Some(snapshot) => {
                if snapshot.state.is_terminal() {
                    self.messages.forget(&snapshot.key).await;
                }
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(game_embed(&snapshot))
                        .components(game_components(&snapshot)),
                )
            }
            None => CreateInteractionResponse::Acknowledge,
        };
        component.create_response(&ctx.http, response).await
    }

    async fn apply(
        &self,
        key: SessionKey,
        actor: ParticipantId,
        button: GameButton,
    ) -> Option<SessionSnapshot> {
        let result = match button {
            GameButton::Move(cell) => self
                .sessions
                .submit_move(key, actor, cell)
                .await
                .map(|outcome| match outcome {
                    MoveOutcome::Accepted(snapshot) => Some(snapshot),
                    MoveOutcome::Ignored => None,
                }),
            GameButton::Stop => self.sessions.stop(key, actor).await.map(|outcome| match outcome {
                StopOutcome::Stopped(snapshot) => Some(snapshot),
                StopOutcome::Ignored => None,
            }),
        };
        result.unwrap_or_else(|e| {
            log!("Could not apply {:?}: {}", button, e);
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ParticipantId {
        ParticipantId::new("111")
    }

    #[test]
    fn test_no_mention_plays_the_bot() {
        assert_eq!(opponent_for(&alice(), None), Some(Participant::Automated));
    }

    #[test]
    fn test_mentioned_user_is_opponent() {
        let bob = ParticipantId::new("222");
        assert_eq!(
            opponent_for(&alice(), Some((bob.clone(), false))),
            Some(Participant::Player(bob))
        );
    }

    #[test]
    fn test_self_and_bot_challenges_are_refused() {
        assert_eq!(opponent_for(&alice(), Some((alice(), false))), None);
        assert_eq!(opponent_for(&alice(), Some((ParticipantId::new("999"), true))), None);
    }
}
