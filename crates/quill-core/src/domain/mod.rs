//! Domain entities - the core business objects.

mod input;
mod post;

pub use input::{AUTHOR_MAX_CHARS, NewPost, PostChanges, PostInput, SearchTerm, TITLE_MAX_CHARS};
pub use post::Post;
