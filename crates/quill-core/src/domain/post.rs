use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NewPost, PostChanges};

/// Post entity - a short text post written by an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a generated ID and timestamps.
    pub fn new(draft: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields and refresh `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Case-insensitive substring match on title, content or author.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.content, &self.author]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostInput;

    fn draft() -> NewPost {
        NewPost::parse(PostInput {
            title: Some("Intro".into()),
            content: Some("Hello world".into()),
            author: Some("Ana".into()),
        })
        .unwrap()
    }

    #[test]
    fn test_new_post_has_equal_timestamps() {
        let post = Post::new(draft());
        assert_eq!(post.created_at, post.updated_at);
        assert_eq!(post.title, "Intro");
    }

    #[test]
    fn test_apply_keeps_unsupplied_fields() {
        let mut post = Post::new(draft());
        let before = post.updated_at;

        post.apply(PostChanges {
            title: Some("Intro 2".into()),
            ..Default::default()
        });

        assert_eq!(post.title, "Intro 2");
        assert_eq!(post.content, "Hello world");
        assert_eq!(post.author, "Ana");
        assert!(post.updated_at >= before);
        assert!(post.created_at <= post.updated_at);
    }

    #[test]
    fn test_matches_any_field_ignoring_case() {
        let post = Post::new(draft());
        assert!(post.matches("ana"));
        assert!(post.matches("world"));
        assert!(post.matches("intro"));
        assert!(!post.matches("bob"));
    }

    #[test]
    fn test_serializes_camel_case_timestamps() {
        let post = Post::new(draft());
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["id"], post.id.to_string());
    }
}
