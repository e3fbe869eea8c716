use std::future::Future;

use super::registry::SessionSnapshot;

/// Receives session endings that no caller is waiting on.
pub trait SessionBroadcaster: Send + Sync + Clone + 'static {
    fn session_timed_out(&self, snapshot: SessionSnapshot) -> impl Future<Output = ()> + Send;
}
