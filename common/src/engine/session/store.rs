use std::collections::HashMap;

use crate::SessionKey;
use crate::games::tictactoe::TicTacToeGameState;

/// A live match together with the id that distinguishes it from earlier
/// matches stored under the same key.
#[derive(Clone, Debug)]
pub struct StoredSession {
    pub session_id: u64,
    pub game: TicTacToeGameState,
}

pub trait SessionStore: Send + 'static {
    fn get(&self, key: &SessionKey) -> Option<&StoredSession>;
    fn get_mut(&mut self, key: &SessionKey) -> Option<&mut StoredSession>;
    fn put(&mut self, key: SessionKey, session: StoredSession);
    fn delete(&mut self, key: &SessionKey) -> Option<StoredSession>;
    fn len(&self) -> usize;

    fn contains(&self, key: &SessionKey) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<SessionKey, StoredSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &SessionKey) -> Option<&StoredSession> {
        self.sessions.get(key)
    }

    fn get_mut(&mut self, key: &SessionKey) -> Option<&mut StoredSession> {
        self.sessions.get_mut(key)
    }

    fn put(&mut self, key: SessionKey, session: StoredSession) {
        self.sessions.insert(key, session);
    }

    fn delete(&mut self, key: &SessionKey) -> Option<StoredSession> {
        self.sessions.remove(key)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
