//! Groups (communities) that posts may be published into.
//!
//! Groups are created out of band and are immutable to the application:
//! posts reference them, nothing here ever writes them.

use std::fmt;

use uuid::Uuid;

use super::slug::is_valid_slug;

/// Validation errors for group components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    /// Title is empty after trimming whitespace.
    #[error("group title must not be empty")]
    EmptyTitle,
    /// Title exceeds the storage column width.
    #[error("group title must be at most {GROUP_TITLE_MAX} characters")]
    TitleTooLong,
    /// Slug contains disallowed characters or is blank.
    #[error("group slug must be lowercase letters, digits, hyphens, or underscores")]
    InvalidSlug,
}

/// Maximum allowed group title length.
pub const GROUP_TITLE_MAX: usize = 200;

/// Stable group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Uuid);

impl GroupId {
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

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// URL-safe unique identifier for a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a [`GroupSlug`].
    pub fn new(value: impl Into<String>) -> Result<Self, GroupValidationError> {
        let value = value.into();
        if !is_valid_slug(&value) {
            return Err(GroupValidationError::InvalidSlug);
        }
        Ok(Self(value))
    }

    /// Borrow the slug as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for GroupSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A community that posts may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Build a group from validated components.
    pub fn new(
        id: GroupId,
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Result<Self, GroupValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong);
        }
        Ok(Self {
            id,
            title,
            slug,
            description: description.into(),
        })
    }

    /// Stable group identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// URL-safe unique identifier.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description shown on the group page.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn slug(value: &str) -> GroupSlug {
        GroupSlug::new(value).expect("valid slug")
    }

    #[rstest]
    fn builds_group() {
        let group = Group::new(GroupId::random(), "Rustaceans", slug("rust"), "All things Rust")
            .expect("valid group");
        assert_eq!(group.title(), "Rustaceans");
        assert_eq!(group.slug().as_str(), "rust");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_title(#[case] title: &str) {
        let result = Group::new(GroupId::random(), title, slug("rust"), "");
        assert_eq!(result, Err(GroupValidationError::EmptyTitle));
    }

    #[rstest]
    fn rejects_overlong_title() {
        let title = "t".repeat(GROUP_TITLE_MAX + 1);
        let result = Group::new(GroupId::random(), title, slug("rust"), "");
        assert_eq!(result, Err(GroupValidationError::TitleTooLong));
    }

    #[rstest]
    #[case("Has Upper")]
    #[case("")]
    fn rejects_invalid_slug(#[case] raw: &str) {
        assert_eq!(GroupSlug::new(raw), Err(GroupValidationError::InvalidSlug));
    }
}
