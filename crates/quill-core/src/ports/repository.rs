use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges, SearchTerm};
use crate::error::RepoError;

/// Generic repository trait defining keyed lookup and removal.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns whether a record was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// Post store.
///
/// Every listing is ordered by `created_at` descending, ties broken by `id`
/// descending.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Persist a new post. The store assigns `id`, `created_at` and `updated_at`.
    async fn insert(&self, draft: NewPost) -> Result<Post, RepoError>;

    /// Merge `changes` into the post and refresh `updated_at`.
    /// Returns `None` if no post has this ID.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError>;

    /// All posts, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts whose title, content or author contain `term`, ignoring case.
    async fn search(&self, term: &SearchTerm) -> Result<Vec<Post>, RepoError>;
}
