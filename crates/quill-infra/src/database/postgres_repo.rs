//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{NewPost, Post, PostChanges, SearchTerm};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn newest_first(select: Select<PostEntity>) -> Select<PostEntity> {
    select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_ignoring_case(column: post::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, draft: NewPost) -> Result<Post, RepoError> {
        let model: post::ActiveModel = Post::new(draft).into();
        let saved = model.insert(&self.db).await.map_err(repo_error)?;

        tracing::debug!(post_id = %saved.id, "Post inserted");
        Ok(saved.into())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        // Row lock serializes concurrent writers on the same post.
        let txn = self.db.begin().await.map_err(repo_error)?;

        let current = PostEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_error)?;

        let Some(current) = current else {
            txn.rollback().await.map_err(repo_error)?;
            return Ok(None);
        };

        let mut updated: Post = current.into();
        updated.apply(changes);

        let model: post::ActiveModel = updated.into();
        let saved = model.update(&txn).await.map_err(repo_error)?;
        txn.commit().await.map_err(repo_error)?;

        tracing::debug!(post_id = %saved.id, "Post updated");
        Ok(Some(saved.into()))
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = newest_first(PostEntity::find())
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<Post>, RepoError> {
        let pattern = format!("%{}%", escape_like(&term.needle()));
        tracing::debug!(term = %term, "Searching posts");

        let result = newest_first(PostEntity::find())
            .filter(
                Condition::any()
                    .add(contains_ignoring_case(post::Column::Title, &pattern))
                    .add(contains_ignoring_case(post::Column::Content, &pattern))
                    .add(contains_ignoring_case(post::Column::Author, &pattern)),
            )
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod escape_tests {
    use super::escape_like;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("ana"), "ana");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
