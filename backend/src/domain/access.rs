//! Pure access and ownership decisions.
//!
//! Handlers translate a `false` here into the appropriate response: a
//! silent redirect to the global feed for ownership denials, or a login
//! redirect for missing authentication. No function in this module
//! performs I/O.

use super::user::UserId;

/// Whether `actor` may edit a post authored by `post_author`.
///
/// Only the author may edit. The handler redirects a non-author to the
/// global feed rather than surfacing an error.
pub fn can_edit_post(post_author: UserId, actor: Option<UserId>) -> bool {
    actor.is_some_and(|actor| actor == post_author)
}

/// Whether `actor` may create a post.
pub fn can_create_post(actor: Option<UserId>) -> bool {
    actor.is_some()
}

/// Whether `actor` may comment on a post.
pub fn can_comment(actor: Option<UserId>) -> bool {
    actor.is_some()
}

/// Whether a follow edge from `user` to `author` may be created.
///
/// Self-follows are refused; the follow action treats them as a no-op.
pub fn can_follow(user: UserId, author: UserId) -> bool {
    user != author
}
