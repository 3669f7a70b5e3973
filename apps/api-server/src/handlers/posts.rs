//! Post handlers.

use std::borrow::Cow;

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::DomainError;
use quill_core::domain::PostInput;
use quill_shared::dto::{PostRequest, SearchResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

fn into_input(req: PostRequest) -> PostInput {
    PostInput {
        title: req.title,
        content: req.content,
        author: req.author,
    }
}

/// Parse an update body. An empty payload means "no fields supplied".
fn parse_changes(body: &[u8]) -> AppResult<PostRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PostRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Json deserialize error: {}", e)))
}

/// Value of `name` in a raw query string, still percent-encoded.
/// Only the form encoding of spaces (`+`) is undone here.
fn raw_query_param<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then(|| {
            if value.contains('+') {
                Cow::Owned(value.replace('+', " "))
            } else {
                Cow::Borrowed(value)
            }
        })
    })
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/search?q=
pub async fn search_posts(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    // Decoding happens once, in the service.
    let raw = raw_query_param(req.query_string(), "q");
    let results = state.posts.search_posts(raw.as_deref()).await?;

    tracing::debug!(term = %results.term, count = results.posts.len(), "Search served");
    Ok(HttpResponse::Ok().json(SearchResponse::new(
        results.term.into_inner(),
        results.posts,
    )))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create_post(into_input(body.into_inner())).await?;

    tracing::info!(post_id = %post.id, request_id = %request_id.as_str(), "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let changes = parse_changes(&body)?;
    let post = state.posts.update_post(&path, into_input(changes)).await?;

    tracing::info!(post_id = %post.id, request_id = %request_id.as_str(), "Post updated");
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.posts.delete_post(&id).await? {
        return Err(DomainError::post_not_found(id).into());
    }

    tracing::info!(post_id = %id, request_id = %request_id.as_str(), "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}
