//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /posts` and `PUT /posts/{id}`.
///
/// Every field is optional on the wire; which ones are required is decided
/// by the post service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Body of `GET /posts/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub query: String,
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> SearchResponse<T> {
    pub fn new(query: impl Into<String>, results: Vec<T>) -> Self {
        Self {
            query: query.into(),
            count: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_allows_missing_fields() {
        let req: PostRequest = serde_json::from_str(r#"{"title":"Intro 2"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("Intro 2"));
        assert!(req.content.is_none());
        assert!(req.author.is_none());
    }

    #[test]
    fn test_search_response_counts_results() {
        let body = serde_json::to_value(SearchResponse::new("ana", vec![1, 2])).unwrap();
        assert_eq!(body["query"], "ana");
        assert_eq!(body["count"], 2);
    }
}
