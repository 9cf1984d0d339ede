//! Domain layer: entities, validation, access rules, and use-case services.
//!
//! Nothing in this module touches HTTP, SQL, or the filesystem. Services
//! implement the driving ports in [`ports`] against the driven ports the
//! adapters under `outbound` provide.

pub mod access;
mod comment;
mod error;
mod feed_service;
mod follow_service;
mod group;
pub mod ports;
mod post;
mod post_service;
mod slug;
mod user;

pub use comment::{Comment, CommentId, CommentText, CommentValidationError, NewComment};
pub use error::{Error, ErrorCode};
pub use feed_service::FeedService;
pub use follow_service::FollowService;
pub use group::{Group, GroupId, GroupSlug, GroupValidationError, GROUP_TITLE_MAX};
pub use post::{
    GroupRef, MediaPath, NewPost, Post, PostChanges, PostId, PostText, PostValidationError,
};
pub use post_service::PostService;
pub use user::{User, UserId, Username, UsernameError, USERNAME_MAX, USERNAME_MIN};
