//! Comments attached to posts.
//!
//! Comments are immutable once created: the application exposes no edit or
//! delete path. They disappear only when their post or author is deleted.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::post::PostId;
use super::user::{User, UserId};

/// Validation errors for comment components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Comment text is empty after trimming whitespace.
    #[error("comment text must not be empty")]
    EmptyText,
}

/// Stable comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct a [`CommentText`].
    pub fn new(value: impl Into<String>) -> Result<Self, CommentValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(value))
    }

    /// Borrow the body as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment on a post, joined with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Stable comment identifier.
    pub id: CommentId,
    /// Post the comment belongs to.
    pub post: PostId,
    /// Commenting user.
    pub author: User,
    /// Comment body.
    pub text: CommentText,
    /// Creation timestamp, set once.
    pub created: DateTime<Utc>,
}

/// Payload for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Post the comment is attached to.
    pub post: PostId,
    /// Commenting user.
    pub author: UserId,
    /// Comment body.
    pub text: CommentText,
}
