mod actor;
mod broadcaster;
mod registry;
mod session_key;
mod store;

pub use actor::{SessionEngine, SessionEngineClosed, SessionEvent, SessionHandle};
pub use broadcaster::SessionBroadcaster;
pub use registry::{
    MoveOutcome, SessionRegistry, SessionSnapshot, SessionState, StartOutcome, StopOutcome,
    TimeoutOutcome,
};
pub use store::{InMemorySessionStore, SessionStore, StoredSession};
