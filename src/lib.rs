//! postsync: a posts client that keeps a subscribable local view in sync with
//! a remote REST collection.
//!
//! - [`application::service`]: the `PostService` boundary and its errors.
//! - [`application::store`]: `PostStore`, the state container and its commands.
//! - [`infra::http`]: `HttpPostService`, the reqwest-backed service.
//! - [`presentation`]: text rendering and the confirmation prompt.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
mod util;
