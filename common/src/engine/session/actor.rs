use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::games::tictactoe::Participant;
use crate::{ParticipantId, SessionKey, log};
use super::broadcaster::SessionBroadcaster;
use super::registry::{MoveOutcome, SessionRegistry, StartOutcome, StopOutcome, TimeoutOutcome};
use super::store::SessionStore;

const EVENT_QUEUE_SIZE: usize = 64;

pub enum SessionEvent {
    StartRequested {
        key: SessionKey,
        first: ParticipantId,
        opponent: Participant,
        reply: oneshot::Sender<StartOutcome>,
    },
    MoveRequested {
        key: SessionKey,
        actor: ParticipantId,
        cell: usize,
        reply: oneshot::Sender<MoveOutcome>,
    },
    StopRequested {
        key: SessionKey,
        actor: ParticipantId,
        reply: oneshot::Sender<StopOutcome>,
    },
    TimeoutFired {
        key: SessionKey,
        session_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEngineClosed;

impl fmt::Display for SessionEngineClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session engine is no longer running")
    }
}

impl std::error::Error for SessionEngineClosed {}

/// Single consumer of every session event. Events are handled one at a
/// time, including the bot's reply, so moves within a session never
/// interleave.
pub struct SessionEngine<S: SessionStore, B: SessionBroadcaster> {
    registry: SessionRegistry<S>,
    receiver: mpsc::Receiver<SessionEvent>,
    timer_sender: mpsc::WeakSender<SessionEvent>,
    inactivity_timeout: Duration,
    broadcaster: B,
}

impl<S: SessionStore, B: SessionBroadcaster> SessionEngine<S, B> {
    pub fn spawn(
        registry: SessionRegistry<S>,
        inactivity_timeout: Duration,
        broadcaster: B,
    ) -> SessionHandle {
        let (sender, receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
        let engine = Self {
            registry,
            receiver,
            timer_sender: sender.downgrade(),
            inactivity_timeout,
            broadcaster,
        };
        tokio::spawn(engine.run());
        SessionHandle { sender }
    }

    async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }
        log!("Session engine stopped with {} active sessions", self.registry.active_sessions());
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StartRequested { key, first, opponent, reply } => {
                let outcome = self.registry.start_session(key, first, opponent);
                if let StartOutcome::Started(ref snapshot) = outcome {
                    self.arm_timer(snapshot.key.clone(), snapshot.session_id);
                }
                let _ = reply.send(outcome);
            }
            SessionEvent::MoveRequested { key, actor, cell, reply } => {
                let _ = reply.send(self.registry.submit_move(&key, &actor, cell));
            }
            SessionEvent::StopRequested { key, actor, reply } => {
                let _ = reply.send(self.registry.stop(&key, &actor));
            }
            SessionEvent::TimeoutFired { key, session_id } => {
                if self.registry.session_id(&key) != Some(session_id) {
                    return;
                }
                if let TimeoutOutcome::TimedOut(snapshot) = self.registry.on_timeout(&key) {
                    let broadcaster = self.broadcaster.clone();
                    tokio::spawn(async move {
                        broadcaster.session_timed_out(snapshot).await;
                    });
                }
            }
        }
    }

    /// One timer per match; moves do not extend it.
    fn arm_timer(&self, key: SessionKey, session_id: u64) {
        let timer_sender = self.timer_sender.clone();
        let timeout = self.inactivity_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(sender) = timer_sender.upgrade() {
                let _ = sender.send(SessionEvent::TimeoutFired { key, session_id }).await;
            }
        });
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    pub async fn start_session(
        &self,
        key: SessionKey,
        first: ParticipantId,
        opponent: Participant,
    ) -> Result<StartOutcome, SessionEngineClosed> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::StartRequested { key, first, opponent, reply }).await?;
        response.await.map_err(|_| SessionEngineClosed)
    }

    pub async fn submit_move(
        &self,
        key: SessionKey,
        actor: ParticipantId,
        cell: usize,
    ) -> Result<MoveOutcome, SessionEngineClosed> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::MoveRequested { key, actor, cell, reply }).await?;
        response.await.map_err(|_| SessionEngineClosed)
    }

    pub async fn stop(
        &self,
        key: SessionKey,
        actor: ParticipantId,
    ) -> Result<StopOutcome, SessionEngineClosed> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::StopRequested { key, actor, reply }).await?;
        response.await.map_err(|_| SessionEngineClosed)
    }

    async fn send(&self, event: SessionEvent) -> Result<(), SessionEngineClosed> {
        self.sender.send(event).await.map_err(|_| SessionEngineClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::{SessionSnapshot, SessionState};

    #[derive(Clone)]
    struct ChannelBroadcaster {
        timed_out: mpsc::UnboundedSender<SessionSnapshot>,
    }

    impl SessionBroadcaster for ChannelBroadcaster {
        async fn session_timed_out(&self, snapshot: SessionSnapshot) {
            let _ = self.timed_out.send(snapshot);
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(180);

    fn spawn_engine() -> (SessionHandle, mpsc::UnboundedReceiver<SessionSnapshot>) {
        let (timed_out, receiver) = mpsc::unbounded_channel();
        let handle = SessionEngine::spawn(
            SessionRegistry::default(),
            TIMEOUT,
            ChannelBroadcaster { timed_out },
        );
        (handle, receiver)
    }

    fn alice() -> ParticipantId {
        ParticipantId::new("alice")
    }

    fn key() -> SessionKey {
        SessionKey::new("chan_alice_bot")
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_round_trip_through_engine() {
        let (handle, _timed_out) = spawn_engine();
        let started = handle.start_session(key(), alice(), Participant::Automated).await.unwrap();
        assert!(matches!(started, StartOutcome::Started(_)));

        let outcome = handle.submit_move(key(), alice(), 0).await.unwrap();
        let MoveOutcome::Accepted(snapshot) = outcome else {
            panic!("move was ignored");
        };
        assert_eq!(snapshot.automated_move, Some(4));

        let again = handle.start_session(key(), alice(), Participant::Automated).await.unwrap();
        assert!(matches!(again, StartOutcome::AlreadyActive));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_timer_ends_match_despite_moves() {
        let (handle, mut timed_out) = spawn_engine();
        handle.start_session(key(), alice(), Participant::Automated).await.unwrap();

        tokio::time::sleep(Duration::from_secs(170)).await;
        let outcome = handle.submit_move(key(), alice(), 0).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Accepted(_)));

        let snapshot = timed_out.recv().await.unwrap();
        assert_eq!(snapshot.state, SessionState::TimedOut);
        assert_eq!(snapshot.key, key());

        let late = handle.submit_move(key(), alice(), 1).await.unwrap();
        assert!(matches!(late, MoveOutcome::Ignored));
        let stop = handle.stop(key(), alice()).await.unwrap();
        assert!(matches!(stop, StopOutcome::Ignored));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_end_newer_session() {
        let (handle, mut timed_out) = spawn_engine();
        let begin = tokio::time::Instant::now();
        handle.start_session(key(), alice(), Participant::Automated).await.unwrap();

        tokio::time::sleep(Duration::from_secs(100)).await;
        let stopped = handle.stop(key(), alice()).await.unwrap();
        assert!(matches!(stopped, StopOutcome::Stopped(_)));
        let restarted = handle.start_session(key(), alice(), Participant::Automated).await.unwrap();
        let StartOutcome::Started(second) = restarted else {
            panic!("restart refused");
        };

        // The first timer fires at 180s and must be discarded.
        tokio::time::sleep(Duration::from_secs(90)).await;
        let outcome = handle.submit_move(key(), alice(), 0).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Accepted(_)));

        let snapshot = timed_out.recv().await.unwrap();
        assert_eq!(snapshot.session_id, second.session_id);
        assert!(begin.elapsed() >= Duration::from_secs(280));
    }
}
