//! Ordered registry of state listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::posts::PostsState;
use crate::util::lock::{rw_read, rw_write};

const SOURCE: &str = "application::store::listeners";

pub type Listener = Arc<dyn Fn(&PostsState) + Send + Sync>;

/// Handle returned by `subscribe`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub(super) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: RwLock<Vec<(Subscription, Listener)>>,
}

impl ListenerRegistry {
    pub(super) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(super) fn register(&self, listener: Listener) -> Subscription {
        let subscription = Subscription(self.next_id.fetch_add(1, Ordering::SeqCst));
        rw_write(&self.entries, SOURCE, "register").push((subscription, listener));
        subscription
    }

    pub(super) fn remove(&self, subscription: Subscription) -> bool {
        let mut entries = rw_write(&self.entries, SOURCE, "remove");
        let before = entries.len();
        entries.retain(|(candidate, _)| *candidate != subscription);
        entries.len() != before
    }

    pub(super) fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener in registration order.
    ///
    /// The registry lock is released before the first call, so listeners may
    /// subscribe or unsubscribe; such changes take effect from the next
    /// dispatch.
    pub(super) fn dispatch(&self, state: &PostsState) {
        let listeners: Vec<Listener> = rw_read(&self.entries, SOURCE, "dispatch")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}
