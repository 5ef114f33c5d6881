//! Subscribable state container for the posts collection.
//!
//! `PostStore` owns one [`PostsState`] and drives it through the four
//! commands in `commands.rs`. Every mutating phase transition is followed by
//! a synchronous dispatch to the registered listeners, in registration order,
//! after the state lock has been released.
//!
//! Each mutation bumps a version. Dispatches are serialized and a snapshot
//! older than one already delivered is dropped, so when commands complete on
//! different threads the last notification a listener sees is never older
//! than the state it could read back.

mod commands;
mod listeners;
mod reducer;

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::application::service::{PostService, ServiceError};
use crate::domain::posts::{MutationKind, PostsState};
use crate::util::lock::{mutex_lock, rw_read, rw_write};

pub use listeners::{Listener, Subscription};

const SOURCE: &str = "application::store";

/// What happens to a fetch that completes after a newer one was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Only the most recently dispatched fetch may change state.
    #[default]
    Discard,
    /// Every completion is applied in arrival order; the last one wins.
    Apply,
}

/// Result of `fetch_all`, which never propagates the service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { count: usize },
    Failed,
    /// A newer fetch was dispatched meanwhile; state was left untouched.
    Superseded,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{command} command rejected: {source}")]
    Rejected {
        command: MutationKind,
        #[source]
        source: ServiceError,
    },
}

impl StoreError {
    pub fn command(&self) -> MutationKind {
        match self {
            StoreError::Rejected { command, .. } => *command,
        }
    }
}

struct StoreInner {
    view: PostsState,
    /// Ticket of the most recently dispatched fetch.
    fetch_ticket: u64,
    /// Bumped on every mutation.
    version: u64,
}

pub struct PostStore {
    service: Arc<dyn PostService>,
    stale_policy: StalePolicy,
    inner: RwLock<StoreInner>,
    listeners: listeners::ListenerRegistry,
    /// Version of the last snapshot handed to the listeners.
    delivered: Mutex<u64>,
}

impl PostStore {
    pub fn new(service: Arc<dyn PostService>) -> Self {
        Self::with_policy(service, StalePolicy::default())
    }

    pub fn with_policy(service: Arc<dyn PostService>, stale_policy: StalePolicy) -> Self {
        Self {
            service,
            stale_policy,
            inner: RwLock::new(StoreInner {
                view: PostsState::default(),
                fetch_ticket: 0,
                version: 0,
            }),
            listeners: listeners::ListenerRegistry::new(),
            delivered: Mutex::new(0),
        }
    }

    /// Clone of the current state.
    pub fn state(&self) -> PostsState {
        rw_read(&self.inner, SOURCE, "state").view.clone()
    }

    /// Read the current state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PostsState) -> R,
    {
        f(&rw_read(&self.inner, SOURCE, "read").view)
    }

    /// Register a listener called after every state mutation.
    ///
    /// The listener receives the full state; it is not told what changed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PostsState) + Send + Sync + 'static,
    {
        self.listeners.register(Arc::new(listener))
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.listeners.remove(subscription)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run `f` under the write lock, then notify listeners when it reports a
    /// change.
    ///
    /// The state lock is released before dispatch; the delivery lock is never
    /// taken while the state lock is held, so listeners may read the store.
    fn apply<R>(&self, op: &'static str, f: impl FnOnce(&mut StoreInner) -> (R, bool)) -> R {
        let (result, snapshot) = {
            let mut inner = rw_write(&self.inner, SOURCE, op);
            let (result, changed) = f(&mut inner);
            if changed {
                inner.version += 1;
            }
            let snapshot = (changed && !self.listeners.is_empty())
                .then(|| (inner.version, inner.view.clone()));
            (result, snapshot)
        };
        if let Some((version, state)) = snapshot {
            let mut delivered = mutex_lock(&self.delivered, SOURCE, op);
            if version > *delivered {
                *delivered = version;
                self.listeners.dispatch(&state);
            } else {
                debug!(op, version, delivered = *delivered, "newer state already delivered");
            }
        }
        result
    }
}

impl fmt::Debug for PostStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostStore")
            .field("stale_policy", &self.stale_policy)
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
