//! User identity as seen by the blog.
//!
//! Accounts are provisioned by the auth collaborator (seed scripts or an
//! admin tool); the application only reads them. Credentials never cross
//! the domain boundary beyond the [`crate::domain::ports::LoginService`]
//! port.

use std::fmt;

use uuid::Uuid;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// Username is empty after trimming whitespace.
    #[error("username must not be empty")]
    Empty,
    /// Username is shorter than the allowed minimum.
    #[error("username must be at least {USERNAME_MIN} characters")]
    TooShort,
    /// Username is longer than the allowed maximum.
    #[error("username must be at most {USERNAME_MAX} characters")]
    TooLong,
    /// Username contains a character outside the allowed set.
    #[error("username may only contain letters, digits, or underscores")]
    InvalidCharacters,
}

/// Minimum allowed username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed username length.
pub const USERNAME_MAX: usize = 32;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique handle the user is addressed by in URLs and bylines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, UsernameError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UsernameError::Empty);
        }
        let length = value.chars().count();
        if length < USERNAME_MIN {
            return Err(UsernameError::TooShort);
        }
        if length > USERNAME_MAX {
            return Err(UsernameError::TooLong);
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Borrow the handle as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Build a user from validated components.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique handle.
    pub fn username(&self) -> &Username {
        &self.username
    }
}
