//! Posts: the central aggregate of the blog.
//!
//! `pub_date` and the author are fixed at creation; edits may only touch
//! the text, the group assignment, and the attached image. Every listing
//! of posts is ordered by `pub_date` descending.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::group::{GroupId, GroupSlug};
use super::user::{User, UserId};

/// Validation errors for post components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Post text is empty after trimming whitespace.
    #[error("post text must not be empty")]
    EmptyText,
    /// Attached image path escapes the media root or is blank.
    #[error("image path must be a relative path inside the media root")]
    InvalidImagePath,
}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(Uuid);

impl PostId {
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

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-empty post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostText(String);

impl PostText {
    /// Validate and construct a [`PostText`].
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        Ok(Self(value))
    }

    /// Borrow the body as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PostText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PostText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative path of an uploaded image inside the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPath(String);

impl MediaPath {
    /// Validate and construct a [`MediaPath`].
    ///
    /// Paths are stored relative to the media root and must not traverse
    /// out of it.
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        let escapes_root = value.starts_with('/')
            || value.contains('\\')
            || value.split('/').any(|segment| segment == ".." || segment.is_empty());
        if value.is_empty() || escapes_root {
            return Err(PostValidationError::InvalidImagePath);
        }
        Ok(Self(value))
    }

    /// Borrow the path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for MediaPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group summary embedded in a post for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    /// Stable group identifier.
    pub id: GroupId,
    /// URL-safe unique identifier.
    pub slug: GroupSlug,
    /// Display title.
    pub title: String,
}

/// A published post, joined with its author and optional group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Stable post identifier.
    pub id: PostId,
    /// Post body.
    pub text: PostText,
    /// Publication timestamp, set once at creation.
    pub pub_date: DateTime<Utc>,
    /// Authoring user.
    pub author: User,
    /// Optional group the post was published into.
    pub group: Option<GroupRef>,
    /// Optional attached image, relative to the media root.
    pub image: Option<MediaPath>,
}

/// Payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Authoring user; immutable after creation.
    pub author: UserId,
    /// Post body.
    pub text: PostText,
    /// Optional group assignment.
    pub group: Option<GroupId>,
    /// Optional attached image, already stored in the media root.
    pub image: Option<MediaPath>,
}

/// Payload for editing a post. The author and `pub_date` never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    /// Replacement body.
    pub text: PostText,
    /// Replacement group assignment (`None` clears it).
    pub group: Option<GroupId>,
    /// Replacement image; `None` keeps the existing attachment.
    pub image: Option<MediaPath>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", true)]
    #[case("  padded  ", true)]
    #[case("", false)]
    #[case("   ", false)]
    fn validates_post_text(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PostText::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("posts/a1b2.png", true)]
    #[case("posts/nested/pic.jpg", true)]
    #[case("/etc/passwd", false)]
    #[case("posts/../../secret", false)]
    #[case("posts//double", false)]
    #[case("posts\\win.png", false)]
    #[case("", false)]
    fn validates_media_paths(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(MediaPath::new(raw).is_ok(), ok);
    }
}
