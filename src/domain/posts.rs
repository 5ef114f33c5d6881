//! Local view model of the remote posts collection.

use std::fmt;

use serde::Serialize;

pub use postsync_api_types::{Post, PostDraft, PostId};

/// Message shown in place of the list when the collection could not be loaded.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch posts.";

/// Snapshot of everything a presentation layer needs to draw the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsState {
    /// Posts in server order; locally created posts are prepended.
    pub posts: Vec<Post>,
    /// True only while a fetch of the whole collection is in flight.
    pub loading: bool,
    /// Set by a failed fetch, cleared when the next fetch starts.
    pub error: Option<String>,
    /// Last failed add, update or delete; cleared by the next successful one.
    pub mutation_error: Option<MutationFailure>,
}

impl PostsState {
    pub fn find(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Add,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationKind::Add => "add",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected mutation, scoped to the command that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationFailure {
    pub command: MutationKind,
    /// Target post, absent for `add` since the server never assigned one.
    pub id: Option<PostId>,
    pub message: String,
}

impl MutationFailure {
    pub fn user_message(&self) -> String {
        match &self.id {
            Some(id) => format!("Failed to {} post {id}.", self.command),
            None => format!("Failed to {} post.", self.command),
        }
    }
}
