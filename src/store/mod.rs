//! Record store abstraction
//!
//! Defines the traits the models use to persist and look up records:
//! - [`MemoryStore`]: keeps everything in memory (for tests and embedding)
//! - [`PgStore`]: Postgres tables created by [`MIGRATOR`](crate::database::MIGRATOR)
use async_trait::async_trait;

use crate::database::Result;
use crate::model::{Author, AuthorChanges, NewAuthor, NewPost, Post, PostChanges};
use crate::types::id::{
    marker::{AuthorMarker, PostMarker},
    Id,
};

mod memory;
mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

/// Storage of [`Author`] records.
///
/// Implementations must reject an insert or an update that would give
/// two authors the same name with [`Error::UniqueViolation`], checking
/// and writing in one atomic step.
///
/// [`Error::UniqueViolation`]: crate::database::Error::UniqueViolation
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn find_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>>;

    /// Names are compared exactly, case and whitespace included.
    async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>>;

    async fn list_authors(&self) -> Result<Vec<Author>>;

    /// `created_at` is set to the current time, `updated_at` is left empty.
    async fn insert_author(&self, author: &NewAuthor) -> Result<Author>;

    /// Sets `updated_at` to the current time. Returns `None` if
    /// the author does not exist.
    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        changes: &AuthorChanges,
    ) -> Result<Option<Author>>;

    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<bool>;
}

/// Storage of [`Post`] records.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>>;

    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn insert_post(&self, post: &NewPost) -> Result<Post>;

    async fn update_post(&self, id: Id<PostMarker>, changes: &PostChanges)
        -> Result<Option<Post>>;

    async fn delete_post(&self, id: Id<PostMarker>) -> Result<bool>;
}
