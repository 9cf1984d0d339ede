//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches out to adapters (the
//! database, the page cache, the media store, the login collaborator).
//! Driving ports are the use-case surface the HTTP adapter calls into.
//! Each driven port exposes strongly typed errors so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use thiserror::Error;

use super::comment::{Comment, CommentText, NewComment};
use super::error::Error as DomainError;
use super::group::{Group, GroupId, GroupSlug};
use super::post::{MediaPath, NewPost, Post, PostChanges, PostId};
use super::user::{User, UserId, Username};

/// Errors surfaced by the persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Connection could not be established or was lost.
    #[error("repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl PersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the page cache adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Cache backend is unavailable or misbehaving.
    #[error("page cache backend failure: {message}")]
    Backend {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl CacheError {
    /// Helper for backend-level failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the media store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaStoreError {
    /// Filesystem or backend write failure.
    #[error("media store write failed: {message}")]
    Write {
        /// Adapter-supplied detail.
        message: String,
    },
    /// The upload carried an unusable file name.
    #[error("uploaded file name is not usable: {message}")]
    InvalidName {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl MediaStoreError {
    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Helper for unusable file names.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the login collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Unknown user or wrong password; the two are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The collaborator could not be reached.
    #[error("login service unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl LoginError {
    /// Helper for availability failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Which slice of the post table a feed reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    /// Every post.
    All,
    /// Posts published into one group.
    Group(GroupId),
    /// Posts by one author.
    Author(UserId),
    /// Posts whose author is followed by the given user.
    FollowedBy(UserId),
}

/// Persistence port for posts.
///
/// Listings are always returned newest-first; the `limit`/`offset` window
/// is computed by the feed service from a clamped page number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post and return it joined with author and group.
    async fn create(&self, new_post: &NewPost) -> Result<Post, PersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PersistenceError>;

    /// Apply edits to an existing post and return the updated row.
    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Post, PersistenceError>;

    /// Count the posts matching `filter`.
    async fn count(&self, filter: &FeedFilter) -> Result<u64, PersistenceError>;

    /// Fetch one window of posts matching `filter`, newest first.
    async fn list(
        &self,
        filter: &FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, PersistenceError>;
}

/// Persistence port for groups. Read-only: groups are managed out of band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by its unique slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, PersistenceError>;

    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, PersistenceError>;

    /// List all groups, for the post form's group selector.
    async fn list(&self) -> Result<Vec<Group>, PersistenceError>;
}

/// Persistence port for comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment and return it joined with its author.
    async fn create(&self, new_comment: &NewComment) -> Result<Comment, PersistenceError>;

    /// List a post's comments, oldest first.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, PersistenceError>;
}

/// Persistence port for follow edges.
///
/// Both mutations are idempotent: the storage layer's uniqueness
/// constraint decides races, and the loser's insert is a no-op.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create the edge if absent. Returns whether a row was inserted.
    async fn insert(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError>;

    /// Delete the edge if present. Returns whether a row was removed.
    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError>;

    /// Whether `user` currently follows `author`.
    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError>;
}

/// Persistence port for users. Read-only: accounts are provisioned out of
/// band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by unique handle.
    async fn find_by_username(&self, username: &Username)
    -> Result<Option<User>, PersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError>;
}

/// Whole-page cache port.
///
/// Entries expire on a TTL owned by the adapter; `invalidate` clears one
/// entry eagerly. The global feed handler is the only consumer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Fetch a cached page body, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a rendered page body under `key`.
    async fn put(&self, key: &str, body: &str) -> Result<(), CacheError>;

    /// Drop the entry stored under `key`, if any.
    async fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

/// An uploaded image as received from the form, before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-supplied file name; only its extension is trusted.
    pub filename: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Media storage port for uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist an upload and return its path relative to the media root.
    async fn store(&self, upload: &ImageUpload) -> Result<MediaPath, MediaStoreError>;
}

/// Authentication collaborator. Credential storage and verification are a
/// black box behind this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the matching user.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, LoginError>;
}

/// A group feed page together with the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFeed {
    /// The requested group.
    pub group: Group,
    /// One page of the group's posts.
    pub page: Page<Post>,
}

/// A profile feed page together with author metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFeed {
    /// The profiled author.
    pub author: User,
    /// One page of the author's posts.
    pub page: Page<Post>,
    /// The author's total post count.
    pub post_count: u64,
    /// Whether the authenticated viewer follows this author. Always
    /// `false` for anonymous viewers.
    pub viewer_follows: bool,
}

/// Everything the post detail page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    /// The requested post.
    pub post: Post,
    /// The author's total post count.
    pub author_post_count: u64,
    /// The post's comments, oldest first.
    pub comments: Vec<Comment>,
}

/// Validated input for creating or editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    /// Post body.
    pub text: super::post::PostText,
    /// Optional group assignment.
    pub group: Option<GroupId>,
    /// Optional freshly uploaded image.
    pub image: Option<ImageUpload>,
}

/// Result of an edit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The actor owns the post; it was updated.
    Updated(Post),
    /// The actor is not the author; nothing was touched.
    NotOwner,
}

/// Driving port: feed composition.
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// All posts, newest first.
    async fn global_feed(&self, page: PageRequest) -> Result<Page<Post>, DomainError>;

    /// One group's posts; unknown slugs are a not-found condition.
    async fn group_feed(
        &self,
        slug: &GroupSlug,
        page: PageRequest,
    ) -> Result<GroupFeed, DomainError>;

    /// One author's posts plus profile metadata.
    async fn profile_feed(
        &self,
        username: &Username,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<ProfileFeed, DomainError>;

    /// Posts by authors the viewer follows, recomputed from the live edge
    /// set on every call.
    async fn follow_feed(
        &self,
        viewer: UserId,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError>;
}

/// Driving port: post lifecycle and comments.
#[async_trait]
pub trait PostOps: Send + Sync {
    /// Everything the detail page needs for one post.
    async fn detail(&self, id: PostId) -> Result<PostDetail, DomainError>;

    /// Groups offered by the post form's selector.
    async fn group_choices(&self) -> Result<Vec<Group>, DomainError>;

    /// Create a post authored by `author`.
    async fn create(&self, author: UserId, input: PostInput) -> Result<Post, DomainError>;

    /// Edit a post; only the author's changes are applied.
    async fn edit(
        &self,
        actor: UserId,
        id: PostId,
        input: PostInput,
    ) -> Result<EditOutcome, DomainError>;

    /// Attach a comment to a post.
    async fn add_comment(
        &self,
        author: UserId,
        post: PostId,
        text: CommentText,
    ) -> Result<Comment, DomainError>;
}

/// Driving port: follow edge management. Both operations are idempotent
/// and treat a self-follow as a no-op.
#[async_trait]
pub trait FollowOps: Send + Sync {
    /// Ensure `user` follows the named author.
    async fn follow(&self, user: UserId, author: &Username) -> Result<(), DomainError>;

    /// Ensure `user` does not follow the named author.
    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), DomainError>;
}
