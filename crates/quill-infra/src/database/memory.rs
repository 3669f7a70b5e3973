//! In-memory post store - used in tests and when no database is configured.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{NewPost, Post, PostChanges, SearchTerm};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

/// In-memory post store using a HashMap behind an async RwLock.
///
/// Writes hold the write lock for their whole read-merge-write, so concurrent
/// writers on the same post serialize and the last one wins.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    fn newest_first<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.remove(&id).is_some())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, draft: NewPost) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let mut post = Post::new(draft);

        // Never reuse an identifier, however unlikely the collision.
        loop {
            match store.entry(post.id) {
                Entry::Occupied(_) => post.id = Uuid::new_v4(),
                Entry::Vacant(slot) => {
                    slot.insert(post.clone());
                    break;
                }
            }
        }

        tracing::debug!(post_id = %post.id, "Post inserted (in-memory)");
        Ok(post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|post| {
            post.apply(changes);
            post.clone()
        }))
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(store.values()))
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<Post>, RepoError> {
        let needle = term.needle();
        let store = self.store.read().await;
        Ok(Self::newest_first(
            store.values().filter(|post| post.matches(&needle)),
        ))
    }
}
