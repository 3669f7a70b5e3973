//! Caller input and the rules that turn it into validated values.

use std::borrow::Cow;
use std::fmt;

use crate::error::ValidationErrors;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum author length, in characters.
pub const AUTHOR_MAX_CHARS: usize = 100;

/// Raw post fields as supplied by a caller. Shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: String,
}

/// Validated partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) author: Option<String>,
}

impl NewPost {
    /// Every field must be present, non-empty after trimming and within its
    /// length limit. All violations are reported together.
    pub fn parse(input: PostInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required("title", input.title, Some(TITLE_MAX_CHARS), &mut errors);
        let content = required("content", input.content, None, &mut errors);
        let author = required("author", input.author, Some(AUTHOR_MAX_CHARS), &mut errors);

        match (title, content, author) {
            (Some(title), Some(content), Some(author)) => Ok(Self {
                title,
                content,
                author,
            }),
            _ => Err(errors),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

impl PostChanges {
    /// Supplied fields follow the same rules as [`NewPost::parse`]; absent
    /// fields are not checked.
    pub fn parse(input: PostInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = input
            .title
            .and_then(|v| normalize("title", v, Some(TITLE_MAX_CHARS), &mut errors));
        let content = input
            .content
            .and_then(|v| normalize("content", v, None, &mut errors));
        let author = input
            .author
            .and_then(|v| normalize("author", v, Some(AUTHOR_MAX_CHARS), &mut errors));

        errors.into_result()?;
        Ok(Self {
            title,
            content,
            author,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
}

fn required(
    field: &'static str,
    value: Option<String>,
    max_chars: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        Some(value) => normalize(field, value, max_chars, errors),
        None => {
            errors.push(field, format!("{field} is required"));
            None
        }
    }
}

fn normalize(
    field: &'static str,
    value: String,
    max_chars: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, format!("{field} must not be empty"));
        return None;
    }
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            errors.push(field, format!("{field} must be at most {max} characters"));
            return None;
        }
    }
    if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}

/// A decoded, trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Percent-decodes `raw` exactly once, then trims it.
    ///
    /// Malformed escapes are kept literally, and a decode that would produce
    /// invalid UTF-8 leaves the input untouched.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationErrors> {
        let raw = raw.unwrap_or_default();
        let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
        let term = decoded.trim();

        if term.is_empty() {
            return Err(ValidationErrors::single("q", "q is required"));
        }
        Ok(Self(term.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for case-insensitive matching.
    pub fn needle(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: Option<&str>, content: Option<&str>, author: Option<&str>) -> PostInput {
        PostInput {
            title: title.map(String::from),
            content: content.map(String::from),
            author: author.map(String::from),
        }
    }

    #[test]
    fn test_new_post_accepts_valid_input() {
        let post = NewPost::parse(input(Some("Intro"), Some("Hello world"), Some("Ana"))).unwrap();
        assert_eq!(post.title(), "Intro");
        assert_eq!(post.content(), "Hello world");
        assert_eq!(post.author(), "Ana");
    }

    #[test]
    fn test_new_post_trims_fields() {
        let post = NewPost::parse(input(Some("  Intro "), Some("Hello"), Some("\tAna\n"))).unwrap();
        assert_eq!(post.title(), "Intro");
        assert_eq!(post.author(), "Ana");
    }

    #[test]
    fn test_new_post_reports_every_missing_field() {
        let errors = NewPost::parse(input(None, Some("   "), None)).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["title", "content", "author"]);
        assert_eq!(errors.errors()[0].message, "title is required");
        assert_eq!(errors.errors()[1].message, "content must not be empty");
    }

    #[test]
    fn test_new_post_rejects_blank_title() {
        let errors = NewPost::parse(input(Some(""), Some("Hello"), Some("Ana"))).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_length_limits_count_characters() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(NewPost::parse(input(Some(title.as_str()), Some("c"), Some("a"))).is_ok());

        let title = "a".repeat(TITLE_MAX_CHARS + 1);
        let author = "a".repeat(AUTHOR_MAX_CHARS + 1);
        let errors = NewPost::parse(input(Some(title.as_str()), Some("c"), Some(author.as_str()))).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title", "author"]);
        assert_eq!(errors.errors()[0].message, "title must be at most 200 characters");
    }

    #[test]
    fn test_changes_allow_partial_input() {
        let changes = PostChanges::parse(input(Some("Intro 2"), None, None)).unwrap();
        assert_eq!(changes.title(), Some("Intro 2"));
        assert_eq!(changes.content(), None);

        let empty = PostChanges::parse(PostInput::default()).unwrap();
        assert_eq!(empty, PostChanges::default());
    }

    #[test]
    fn test_changes_reject_blank_supplied_field() {
        let errors = PostChanges::parse(input(None, None, Some("  "))).unwrap_err();
        assert_eq!(errors.to_string(), "author must not be empty");
    }

    #[test]
    fn test_search_term_requires_text() {
        assert!(SearchTerm::parse(None).is_err());
        assert!(SearchTerm::parse(Some("   ")).is_err());
        assert!(SearchTerm::parse(Some("%20%20")).is_err());
        let errors = SearchTerm::parse(Some("")).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["q"]);
    }

    #[test]
    fn test_search_term_decodes_once() {
        assert_eq!(SearchTerm::parse(Some("ana")).unwrap().as_str(), "ana");
        assert_eq!(SearchTerm::parse(Some("caf%C3%A9")).unwrap().as_str(), "café");
        assert_eq!(SearchTerm::parse(Some("caf%C3%A9")).unwrap().needle(), "café");
        assert_eq!(SearchTerm::parse(Some("%2541")).unwrap().as_str(), "%41");
        assert_eq!(SearchTerm::parse(Some(" Hello%20World ")).unwrap().as_str(), "Hello World");
    }

    #[test]
    fn test_search_term_keeps_malformed_escapes() {
        assert_eq!(SearchTerm::parse(Some("100%")).unwrap().as_str(), "100%");
        assert_eq!(SearchTerm::parse(Some("%FF")).unwrap().as_str(), "%FF");
    }
}
