//! The four asynchronous commands and their phase transitions.
//!
//! | command   | pending                | fulfilled             | rejected                  |
//! |-----------|------------------------|-----------------------|---------------------------|
//! | fetch_all | loading, error cleared | posts replaced        | loading off, error set    |
//! | add       | -                      | post prepended        | mutation failure recorded |
//! | update    | -                      | post replaced by id   | mutation failure recorded |
//! | delete    | -                      | posts with id removed | mutation failure recorded |

use tracing::{debug, instrument, warn};

use crate::application::service::ServiceError;
use crate::domain::posts::{MutationFailure, MutationKind, Post, PostDraft, PostId};

use super::{FetchOutcome, PostStore, StalePolicy, StoreError, reducer};

impl PostStore {
    /// Load the whole collection, replacing the local list.
    ///
    /// Failures are caught here and surface only as `error` in the state.
    #[instrument(skip_all)]
    pub async fn fetch_all(&self) -> FetchOutcome {
        let ticket = self.apply("fetch_all.pending", |inner| {
            inner.fetch_ticket += 1;
            reducer::fetch_pending(&mut inner.view);
            (inner.fetch_ticket, true)
        });
        debug!(ticket, "fetch_all pending");

        let result = self.service.list_posts().await;
        let failure = result.as_ref().err().map(ToString::to_string);

        let stale_policy = self.stale_policy;
        let outcome = self.apply("fetch_all.settled", move |inner| {
            if stale_policy == StalePolicy::Discard && inner.fetch_ticket != ticket {
                return (FetchOutcome::Superseded, false);
            }
            match result {
                Ok(posts) => {
                    let count = reducer::fetch_fulfilled(&mut inner.view, posts);
                    (FetchOutcome::Applied { count }, true)
                }
                Err(_) => {
                    reducer::fetch_rejected(&mut inner.view);
                    (FetchOutcome::Failed, true)
                }
            }
        });

        match (outcome, failure) {
            (FetchOutcome::Applied { count }, _) => debug!(ticket, count, "fetch_all fulfilled"),
            (FetchOutcome::Failed, Some(error)) => warn!(ticket, %error, "fetch_all rejected"),
            (FetchOutcome::Failed, None) => warn!(ticket, "fetch_all rejected"),
            (FetchOutcome::Superseded, _) => {
                debug!(ticket, "fetch_all superseded by a newer fetch; outcome discarded");
            }
        }
        outcome
    }

    /// Create a post; the server-returned record goes to the front of the list.
    #[instrument(skip_all, fields(title = %draft.title))]
    pub async fn add(&self, draft: PostDraft) -> Result<Post, StoreError> {
        match self.service.create_post(&draft).await {
            Ok(post) => {
                let created = post.clone();
                let replaced = self.apply("add.fulfilled", |inner| {
                    (reducer::add_fulfilled(&mut inner.view, created), true)
                });
                debug!(id = %post.id, replaced, "add fulfilled");
                Ok(post)
            }
            Err(source) => Err(self.reject(MutationKind::Add, None, source)),
        }
    }

    /// Replace a post; a server record whose id is not in the list is ignored.
    #[instrument(skip_all, fields(id = %post.id))]
    pub async fn update(&self, post: Post) -> Result<Post, StoreError> {
        let target = post.id.clone();
        match self.service.update_post(&post).await {
            Ok(updated) => {
                let record = updated.clone();
                let found = self.apply("update.fulfilled", |inner| {
                    (reducer::update_fulfilled(&mut inner.view, record), true)
                });
                if found {
                    debug!(id = %updated.id, "update fulfilled");
                } else {
                    debug!(id = %updated.id, "update fulfilled for a post not in the list");
                }
                Ok(updated)
            }
            Err(source) => Err(self.reject(MutationKind::Update, Some(target), source)),
        }
    }

    /// Delete a post; every entry with the resolved id leaves the list.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: PostId) -> Result<PostId, StoreError> {
        match self.service.delete_post(&id).await {
            Ok(deleted) => {
                let removed = self.apply("delete.fulfilled", |inner| {
                    (reducer::delete_fulfilled(&mut inner.view, &deleted), true)
                });
                debug!(id = %deleted, removed, "delete fulfilled");
                Ok(deleted)
            }
            Err(source) => Err(self.reject(MutationKind::Delete, Some(id), source)),
        }
    }

    fn reject(
        &self,
        command: MutationKind,
        id: Option<PostId>,
        source: ServiceError,
    ) -> StoreError {
        warn!(%command, error = %source, "mutation rejected");
        let failure = MutationFailure {
            command,
            id,
            message: source.to_string(),
        };
        self.apply("mutation.rejected", |inner| {
            reducer::mutation_rejected(&mut inner.view, failure);
            ((), true)
        });
        StoreError::Rejected { command, source }
    }
}
