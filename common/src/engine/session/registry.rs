use crate::games::tictactoe::{Board, GameStatus, Mark, Participant, TicTacToeGameState};
use crate::{ParticipantId, SessionKey, log};
use super::store::{InMemorySessionStore, SessionStore, StoredSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    AwaitingMove(Participant),
    Won { mark: Mark, winner: Participant },
    Draw,
    Stopped { by: ParticipantId },
    TimedOut,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::AwaitingMove(_))
    }
}

/// What the front end needs to render a session after an event.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub key: SessionKey,
    pub session_id: u64,
    pub board: Board,
    pub player_x: ParticipantId,
    pub player_o: Participant,
    pub state: SessionState,
    /// Cell the bot answered with while handling this event.
    pub automated_move: Option<usize>,
}

impl SessionSnapshot {
    fn capture(key: &SessionKey, session: &StoredSession, state: SessionState) -> Self {
        Self {
            key: key.clone(),
            session_id: session.session_id,
            board: *session.game.board(),
            player_x: session.game.player_x().clone(),
            player_o: session.game.player_o().clone(),
            state,
            automated_move: None,
        }
    }

    fn from_game(key: &SessionKey, session: &StoredSession) -> Self {
        let game = &session.game;
        let state = match game.status() {
            GameStatus::InProgress => SessionState::AwaitingMove(game.current_participant()),
            GameStatus::Draw => SessionState::Draw,
            GameStatus::XWon | GameStatus::OWon => match game.get_winner() {
                Some(winner) => SessionState::Won {
                    mark: game.status().winner_mark().unwrap_or(Mark::X),
                    winner,
                },
                None => SessionState::Draw,
            },
        };
        Self::capture(key, session, state)
    }
}

#[derive(Clone, Debug)]
pub enum StartOutcome {
    Started(SessionSnapshot),
    AlreadyActive,
}

#[derive(Clone, Debug)]
pub enum MoveOutcome {
    Accepted(SessionSnapshot),
    Ignored,
}

#[derive(Clone, Debug)]
pub enum StopOutcome {
    Stopped(SessionSnapshot),
    Ignored,
}

#[derive(Clone, Debug)]
pub enum TimeoutOutcome {
    TimedOut(SessionSnapshot),
    Ignored,
}

/// Owns every live tic-tac-toe session and applies the session lifecycle:
/// a session leaves the store as soon as it reaches a terminal state.
pub struct SessionRegistry<S: SessionStore = InMemorySessionStore> {
    store: S,
    next_session_id: u64,
}

impl Default for SessionRegistry<InMemorySessionStore> {
    fn default() -> Self {
        Self::new(InMemorySessionStore::new())
    }
}

impl<S: SessionStore> SessionRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            next_session_id: 1,
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }

    pub fn session_id(&self, key: &SessionKey) -> Option<u64> {
        self.store.get(key).map(|session| session.session_id)
    }

    pub fn snapshot(&self, key: &SessionKey) -> Option<SessionSnapshot> {
        self.store
            .get(key)
            .map(|session| SessionSnapshot::from_game(key, session))
    }

    pub fn start_session(
        &mut self,
        key: SessionKey,
        first: ParticipantId,
        opponent: Participant,
    ) -> StartOutcome {
        if self.store.contains(&key) {
            log!("[session:{}] Start refused, a game is already running", key);
            return StartOutcome::AlreadyActive;
        }

        let session = StoredSession {
            session_id: self.next_session_id,
            game: TicTacToeGameState::new(first, opponent),
        };
        self.next_session_id += 1;

        let snapshot = SessionSnapshot::from_game(&key, &session);
        log!(
            "[session:{}] Started #{}: {} vs {}",
            key,
            session.session_id,
            session.game.player_x(),
            session.game.player_o()
        );
        self.store.put(key, session);
        StartOutcome::Started(snapshot)
    }

    /// Applies a human move and, when the bot is next, its reply. Wrong
    /// turn, occupied or out-of-range cells are ignored without detail.
    pub fn submit_move(&mut self, key: &SessionKey, actor: &ParticipantId, cell: usize) -> MoveOutcome {
        let Some(session) = self.store.get_mut(key) else {
            return MoveOutcome::Ignored;
        };

        let actor = Participant::Player(actor.clone());
        if let Err(e) = session.game.place_mark(&actor, cell) {
            log!("[session:{}] Ignored move by {} at {}: {}", key, actor, cell, e);
            return MoveOutcome::Ignored;
        }

        let automated_move = session.game.play_automated_turn();

        let mut snapshot = SessionSnapshot::from_game(key, session);
        snapshot.automated_move = automated_move;

        if snapshot.state.is_terminal() {
            self.store.delete(key);
            log!("[session:{}] Finished: {:?}", key, snapshot.state);
        }

        MoveOutcome::Accepted(snapshot)
    }

    /// Either human participant may stop the match at any time.
    pub fn stop(&mut self, key: &SessionKey, actor: &ParticipantId) -> StopOutcome {
        let is_participant = self
            .store
            .get(key)
            .is_some_and(|session| session.game.is_participant(actor));
        if !is_participant {
            return StopOutcome::Ignored;
        }

        let Some(session) = self.store.delete(key) else {
            return StopOutcome::Ignored;
        };

        log!("[session:{}] Stopped by {}", key, actor);
        StopOutcome::Stopped(SessionSnapshot::capture(
            key,
            &session,
            SessionState::Stopped { by: actor.clone() },
        ))
    }

    pub fn on_timeout(&mut self, key: &SessionKey) -> TimeoutOutcome {
        let Some(session) = self.store.delete(key) else {
            return TimeoutOutcome::Ignored;
        };

        log!("[session:{}] Timed out", key);
        TimeoutOutcome::TimedOut(SessionSnapshot::capture(key, &session, SessionState::TimedOut))
    }
}
