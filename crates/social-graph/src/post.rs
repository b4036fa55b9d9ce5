//! Post entity and id allocation
//!
//! A post is immutable once constructed: the validating constructor checks
//! author and text up front, and everything afterwards is read-only. Ids come
//! from an explicit [`PostIdAllocator`] owned by the network rather than a
//! process-wide counter, so every test (and every network) starts from a
//! fresh, reproducible sequence. An id is only consumed when validation
//! succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when constructing a post
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    /// A required field was never supplied
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A required field was blank
    #[error("Field cannot be blank: {0}")]
    EmptyField(&'static str),

    /// Post text too long
    #[error("Text too long: {length} characters (max {limit})")]
    TextTooLong {
        /// Actual length in characters
        length: usize,
        /// Maximum allowed
        limit: usize,
    },
}

/// Result type for post operations
pub type Result<T> = std::result::Result<T, PostError>;

/// Maximum length of post text (in characters)
pub const MAX_TEXT_LENGTH: usize = 140;

/// Unique identifier of a post
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PostId(u64);

impl PostId {
    /// Get the raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing post ids, starting at 0
///
/// Each network owns one allocator. Ids are unique per allocator, never
/// reused, and only consumed by successful post construction.
#[derive(Debug, Clone, Default)]
pub struct PostIdAllocator {
    next: u64,
}

impl PostIdAllocator {
    /// Create an allocator whose first id is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next id in the sequence
    pub fn allocate(&mut self) -> PostId {
        let id = PostId(self.next);
        self.next += 1;
        id
    }
}

/// A short text post
///
/// Carries its id, author, text and creation time. Immutable after
/// construction; cloning produces a value-equal independent instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post, validating author and text
    ///
    /// Draws the next id from `ids` only after validation passes.
    ///
    /// # Errors
    ///
    /// - `PostError::EmptyField` - author or text is blank
    /// - `PostError::TextTooLong` - text exceeds [`MAX_TEXT_LENGTH`] characters
    pub fn new(
        ids: &mut PostIdAllocator,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self> {
        let author = author.into();
        let text = text.into();

        if author.trim().is_empty() {
            return Err(PostError::EmptyField("author"));
        }
        if text.trim().is_empty() {
            return Err(PostError::EmptyField("text"));
        }
        let length = text.chars().count();
        if length > MAX_TEXT_LENGTH {
            return Err(PostError::TextTooLong { length, limit: MAX_TEXT_LENGTH });
        }

        Ok(Self { id: ids.allocate(), author, text, created_at: Utc::now() })
    }

    /// Get the post id
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Get the author's username
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Get the post text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Post{{id={}, author='{}', text='{}', created_at={}}}",
            self.id, self.author, self.text, self.created_at
        )
    }
}

/// Builder for posts whose fields arrive separately
///
/// Unlike [`Post::new`], whose parameters are required by the signature, the
/// builder can report which field was never supplied at all — useful for
/// drivers assembling a post from optional input.
#[derive(Debug, Clone, Default)]
pub struct PostBuilder {
    author: Option<String>,
    text: Option<String>,
}

impl PostBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Build the post, drawing an id from `ids`
    ///
    /// # Errors
    ///
    /// - `PostError::MissingField` - author or text was never set
    /// - plus every [`Post::new`] validation error
    pub fn build(self, ids: &mut PostIdAllocator) -> Result<Post> {
        let author = self.author.ok_or(PostError::MissingField("author"))?;
        let text = self.text.ok_or(PostError::MissingField("text"))?;
        Post::new(ids, author, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_new_valid() {
        let mut ids = PostIdAllocator::new();
        let post = Post::new(&mut ids, "leo", "first post").unwrap();

        assert_eq!(post.id().value(), 0);
        assert_eq!(post.author(), "leo");
        assert_eq!(post.text(), "first post");
    }

    #[test]
    fn test_post_ids_strictly_increasing() {
        let mut ids = PostIdAllocator::new();
        let a = Post::new(&mut ids, "leo", "one").unwrap();
        let b = Post::new(&mut ids, "leo", "two").unwrap();
        let c = Post::new(&mut ids, "dave", "three").unwrap();

        assert!(a.id() < b.id());
        assert!(b.id() < c.id());
    }

    #[test]
    fn test_failed_creation_consumes_no_id() {
        let mut ids = PostIdAllocator::new();
        assert!(Post::new(&mut ids, "leo", "").is_err());

        let post = Post::new(&mut ids, "leo", "ok").unwrap();
        assert_eq!(post.id().value(), 0);
    }

    #[test]
    fn test_post_new_blank_author() {
        let mut ids = PostIdAllocator::new();
        let err = Post::new(&mut ids, "   ", "text").unwrap_err();
        assert_eq!(err, PostError::EmptyField("author"));
    }

    #[test]
    fn test_post_new_blank_text() {
        let mut ids = PostIdAllocator::new();
        let err = Post::new(&mut ids, "leo", "  \t ").unwrap_err();
        assert_eq!(err, PostError::EmptyField("text"));
    }

    #[test]
    fn test_post_text_length_boundary() {
        let mut ids = PostIdAllocator::new();

        let at_limit = "x".repeat(MAX_TEXT_LENGTH);
        assert!(Post::new(&mut ids, "leo", at_limit).is_ok());

        let over_limit = "x".repeat(MAX_TEXT_LENGTH + 1);
        let err = Post::new(&mut ids, "leo", over_limit).unwrap_err();
        assert_eq!(err, PostError::TextTooLong { length: 141, limit: 140 });
    }

    #[test]
    fn test_post_text_length_counted_in_chars() {
        let mut ids = PostIdAllocator::new();
        // 140 multibyte characters must pass even though the byte length is larger
        let text = "è".repeat(MAX_TEXT_LENGTH);
        assert!(Post::new(&mut ids, "leo", text).is_ok());
    }

    #[test]
    fn test_post_clone_is_value_equal() {
        let mut ids = PostIdAllocator::new();
        let post = Post::new(&mut ids, "leo", "hello").unwrap();
        let copy = post.clone();

        assert_eq!(post, copy);
        assert_eq!(post.id(), copy.id());
        assert_eq!(post.created_at(), copy.created_at());
    }

    #[test]
    fn test_post_display() {
        let mut ids = PostIdAllocator::new();
        let post = Post::new(&mut ids, "leo", "hello").unwrap();
        let shown = post.to_string();

        assert!(shown.starts_with("Post{id=0"));
        assert!(shown.contains("author='leo'"));
        assert!(shown.contains("text='hello'"));
    }

    #[test]
    fn test_post_serialization_roundtrip() {
        let mut ids = PostIdAllocator::new();
        let post = Post::new(&mut ids, "leo", "hello").unwrap();

        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(post, back);
    }

    #[test]
    fn test_builder_complete() {
        let mut ids = PostIdAllocator::new();
        let post = PostBuilder::new()
            .author("leo")
            .text("built post")
            .build(&mut ids)
            .unwrap();

        assert_eq!(post.author(), "leo");
        assert_eq!(post.text(), "built post");
    }

    #[test]
    fn test_builder_missing_author() {
        let mut ids = PostIdAllocator::new();
        let err = PostBuilder::new().text("no author").build(&mut ids).unwrap_err();
        assert_eq!(err, PostError::MissingField("author"));
    }

    #[test]
    fn test_builder_missing_text() {
        let mut ids = PostIdAllocator::new();
        let err = PostBuilder::new().author("leo").build(&mut ids).unwrap_err();
        assert_eq!(err, PostError::MissingField("text"));
    }

    #[test]
    fn test_builder_still_validates() {
        let mut ids = PostIdAllocator::new();
        let err = PostBuilder::new().author("leo").text("").build(&mut ids).unwrap_err();
        assert_eq!(err, PostError::EmptyField("text"));
    }

    #[test]
    fn test_post_error_display() {
        let err = PostError::TextTooLong { length: 141, limit: 140 };
        assert!(err.to_string().contains("141"));
        assert!(err.to_string().contains("140"));

        let err = PostError::EmptyField("author");
        assert!(err.to_string().contains("author"));
    }
}
