//! Post service - validation and orchestration over a [`PostRepository`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges, PostInput, SearchTerm};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Upper bound on any single store call unless configured otherwise.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a search: the term actually matched and the posts it found.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub term: SearchTerm,
    pub posts: Vec<Post>,
}

/// Stateless mediator between callers and the post store.
///
/// Cloning is cheap; every clone shares the same store.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    timeout: Duration,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self {
            repo,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound every store call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.guarded(self.repo.list_all()).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, DomainError> {
        let uuid = parse_id(id).ok_or_else(|| DomainError::post_not_found(id))?;
        self.guarded(self.repo.find_by_id(uuid))
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Validates before the store is touched.
    pub async fn create_post(&self, input: PostInput) -> Result<Post, DomainError> {
        let draft = NewPost::parse(input)?;
        self.guarded(self.repo.insert(draft)).await
    }

    /// Existence is checked first, then the supplied fields are validated.
    pub async fn update_post(&self, id: &str, input: PostInput) -> Result<Post, DomainError> {
        let post = self.get_post(id).await?;
        let changes = PostChanges::parse(input)?;

        // A concurrent delete may land between the lookup and the write.
        self.guarded(self.repo.update(post.id, changes))
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Returns whether a post existed and was removed.
    pub async fn delete_post(&self, id: &str) -> Result<bool, DomainError> {
        match parse_id(id) {
            Some(uuid) => self.guarded(self.repo.delete(uuid)).await,
            None => Ok(false),
        }
    }

    /// `raw` may still be percent-encoded; it is decoded exactly once.
    pub async fn search_posts(&self, raw: Option<&str>) -> Result<SearchResults, DomainError> {
        let term = SearchTerm::parse(raw)?;
        let posts = self.guarded(self.repo.search(&term)).await?;
        Ok(SearchResults { term, posts })
    }

    async fn guarded<T>(
        &self,
        op: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(DomainError::from),
            Err(_) => Err(RepoError::Timeout(self.timeout).into()),
        }
    }
}

/// Identifiers are opaque to callers; anything that is not a UUID names no post.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}
