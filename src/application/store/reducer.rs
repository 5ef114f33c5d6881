//! Pure state transitions applied when a command changes phase.

use std::collections::HashSet;

use crate::domain::posts::{FETCH_FAILED_MESSAGE, MutationFailure, Post, PostId, PostsState};

pub(super) fn fetch_pending(state: &mut PostsState) {
    state.loading = true;
    state.error = None;
}

/// Replaces the list and returns how many posts were kept.
///
/// Repeated ids keep their first occurrence.
pub(super) fn fetch_fulfilled(state: &mut PostsState, posts: Vec<Post>) -> usize {
    let mut seen = HashSet::with_capacity(posts.len());
    state.posts = posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect();
    state.loading = false;
    state.posts.len()
}

pub(super) fn fetch_rejected(state: &mut PostsState) {
    state.loading = false;
    state.error = Some(FETCH_FAILED_MESSAGE.to_string());
}

/// Prepends the created post; returns true when an entry with the same id
/// was already present and has been dropped.
pub(super) fn add_fulfilled(state: &mut PostsState, post: Post) -> bool {
    let before = state.posts.len();
    state.posts.retain(|existing| existing.id != post.id);
    let replaced = state.posts.len() != before;
    state.posts.insert(0, post);
    state.mutation_error = None;
    replaced
}

/// Replaces the post with the same id in place; returns false when absent.
pub(super) fn update_fulfilled(state: &mut PostsState, post: Post) -> bool {
    state.mutation_error = None;
    match state.posts.iter_mut().find(|existing| existing.id == post.id) {
        Some(slot) => {
            *slot = post;
            true
        }
        None => false,
    }
}

/// Removes every post with the given id and returns how many were removed.
pub(super) fn delete_fulfilled(state: &mut PostsState, id: &PostId) -> usize {
    let before = state.posts.len();
    state.posts.retain(|post| &post.id != id);
    state.mutation_error = None;
    before - state.posts.len()
}

pub(super) fn mutation_rejected(state: &mut PostsState, failure: MutationFailure) {
    state.mutation_error = Some(failure);
}
