//! Discussion store
//!
//! The [`Store`] trait is everything the request handlers need from the
//! document store: create, find-all, find-by-id, find-by-id-and-update,
//! find-by-id-and-remove, a single-field view-count write, and reference
//! population for the `author` and `comments` relations.

pub mod error;
pub mod sqlite;

use std::future::Future;

use board_protocol::{Comment, Discussion, DiscussionParams, User};

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;

/// Which relations to resolve into full entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Populate {
    pub author: bool,
    pub comments: bool,
}

impl Populate {
    pub const NONE: Self = Self {
        author: false,
        comments: false,
    };
    pub const AUTHOR: Self = Self {
        author: true,
        comments: false,
    };
    pub const ALL: Self = Self {
        author: true,
        comments: true,
    };
}

/// Trait implemented by discussion stores.
///
/// Every operation is independent; nothing spans two calls.
pub trait Store: Send + Sync + 'static {
    /// Persist a new discussion. Fails with [`StoreError::Schema`] when the
    /// record is missing a required field or carries an unknown category.
    fn create(
        &self,
        params: DiscussionParams,
    ) -> impl Future<Output = StoreResult<Discussion>> + Send;

    /// Every discussion in insertion order.
    fn find_all(
        &self,
        populate: Populate,
    ) -> impl Future<Output = StoreResult<Vec<Discussion>>> + Send;

    /// Exactly one discussion, or [`StoreError::NotFound`].
    fn find_by_id(
        &self,
        id: &str,
        populate: Populate,
    ) -> impl Future<Output = StoreResult<Discussion>> + Send;

    /// Set every `Some` field of `params` in one statement and return the
    /// updated discussion. `None` fields are left untouched.
    fn find_by_id_and_update(
        &self,
        id: &str,
        params: DiscussionParams,
        populate: Populate,
    ) -> impl Future<Output = StoreResult<Discussion>> + Send;

    /// Remove one discussion (and its comments). `Ok(None)` when nothing
    /// matched.
    fn find_by_id_and_remove(
        &self,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<Discussion>>> + Send;

    /// Write the view count of one discussion.
    fn save_views(&self, id: &str, views: u64) -> impl Future<Output = StoreResult<()>> + Send;

    fn create_user(
        &self,
        name: &str,
        email: &str,
    ) -> impl Future<Output = StoreResult<User>> + Send;

    fn add_comment(
        &self,
        discussion_id: &str,
        author_id: Option<&str>,
        content: &str,
    ) -> impl Future<Output = StoreResult<Comment>> + Send;
}
