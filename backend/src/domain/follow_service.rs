//! Follow edge management.
//!
//! Both operations resolve the target author by username and are
//! idempotent: following twice or unfollowing an absent edge changes
//! nothing. A self-follow is silently ignored.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::access::can_follow;
use super::error::Error;
use super::feed_service::map_persistence_error;
use super::ports::{FollowOps, FollowRepository, UserRepository};
use super::user::{User, UserId, Username};

/// Implements [`FollowOps`] over the user and follow repositories.
#[derive(Clone)]
pub struct FollowService<U, F> {
    users: Arc<U>,
    follows: Arc<F>,
}

impl<U, F> FollowService<U, F> {
    /// Create a follow service with the given repositories.
    pub fn new(users: Arc<U>, follows: Arc<F>) -> Self {
        Self { users, follows }
    }
}

impl<U, F> FollowService<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    async fn resolve_author(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no user named {username}")))
    }
}

#[async_trait]
impl<U, F> FollowOps for FollowService<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    async fn follow(&self, user: UserId, author: &Username) -> Result<(), Error> {
        let author = self.resolve_author(author).await?;
        if !can_follow(user, author.id()) {
            debug!(user = %user, "self-follow ignored");
            return Ok(());
        }
        let inserted = self
            .follows
            .insert(user, author.id())
            .await
            .map_err(map_persistence_error)?;
        if inserted {
            debug!(user = %user, author = %author.username(), "follow edge created");
        }
        Ok(())
    }

    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), Error> {
        let author = self.resolve_author(author).await?;
        let removed = self
            .follows
            .remove(user, author.id())
            .await
            .map_err(map_persistence_error)?;
        if removed {
            debug!(user = %user, author = %author.username(), "follow edge removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockFollowRepository, MockUserRepository};
    use crate::domain::ErrorCode;
    use mockall::predicate::eq;

    fn sample_user(name: &str) -> User {
        User::new(UserId::random(), Username::new(name).expect("valid username"))
    }

    fn service(
        users: MockUserRepository,
        follows: MockFollowRepository,
    ) -> FollowService<MockUserRepository, MockFollowRepository> {
        FollowService::new(Arc::new(users), Arc::new(follows))
    }

    #[tokio::test]
    async fn follow_inserts_edge_for_distinct_users() {
        let author = sample_user("ada");
        let author_id = author.id();
        let viewer = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(author)));
        let mut follows = MockFollowRepository::new();
        follows
            .expect_insert()
            .with(eq(viewer), eq(author_id))
            .return_once(|_, _| Ok(true));

        let service = service(users, follows);
        let username = Username::new("ada").expect("valid username");
        service.follow(viewer, &username).await.expect("follow");
    }

    #[tokio::test]
    async fn self_follow_is_a_no_op() {
        let author = sample_user("ada");
        let author_id = author.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(author)));
        let mut follows = MockFollowRepository::new();
        follows.expect_insert().times(0);

        let service = service(users, follows);
        let username = Username::new("ada").expect("valid username");
        service.follow(author_id, &username).await.expect("no-op");
    }

    #[tokio::test]
    async fn follow_unknown_author_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));

        let service = service(users, MockFollowRepository::new());
        let username = Username::new("ghost").expect("valid username");
        let error = service
            .follow(UserId::random(), &username)
            .await
            .expect_err("unknown author");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn unfollow_tolerates_absent_edge() {
        let author = sample_user("ada");
        let viewer = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(author)));
        let mut follows = MockFollowRepository::new();
        follows.expect_remove().return_once(|_, _| Ok(false));

        let service = service(users, follows);
        let username = Username::new("ada").expect("valid username");
        service.unfollow(viewer, &username).await.expect("no-op");
    }
}
