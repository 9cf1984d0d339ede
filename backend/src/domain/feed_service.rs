//! Feed composition.
//!
//! Four feeds, each newest-first and paginated: global, group, profile,
//! and follow-only. The follow feed recomputes from the live edge set on
//! every call; nothing here caches (the global feed's whole-page cache
//! lives in the HTTP adapter).

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest, Paginator};

use super::error::Error;
use super::ports::{
    FeedFilter, FeedQuery, FollowRepository, GroupFeed, GroupRepository, PersistenceError,
    PostRepository, ProfileFeed, UserRepository,
};
use super::post::Post;
use super::user::{UserId, Username};
use super::GroupSlug;

/// Map repository failures into domain errors.
pub(crate) fn map_persistence_error(error: PersistenceError) -> Error {
    match error {
        PersistenceError::Connection { message } => {
            Error::internal(format!("storage unavailable: {message}"))
        }
        PersistenceError::Query { message } => Error::internal(format!("storage error: {message}")),
    }
}

/// Implements [`FeedQuery`] over the persistence ports.
#[derive(Clone)]
pub struct FeedService<P, G, U, F> {
    posts: Arc<P>,
    groups: Arc<G>,
    users: Arc<U>,
    follows: Arc<F>,
    paginator: Paginator,
}

impl<P, G, U, F> FeedService<P, G, U, F> {
    /// Create a feed service with the given repositories and page size.
    pub fn new(
        posts: Arc<P>,
        groups: Arc<G>,
        users: Arc<U>,
        follows: Arc<F>,
        paginator: Paginator,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            follows,
            paginator,
        }
    }
}

impl<P, G, U, F> FeedService<P, G, U, F>
where
    P: PostRepository,
    G: GroupRepository,
    U: UserRepository,
    F: FollowRepository,
{
    /// Count, clamp, then fetch one window of the filtered feed.
    async fn paged(&self, filter: &FeedFilter, page: PageRequest) -> Result<Page<Post>, Error> {
        let total = self
            .posts
            .count(filter)
            .await
            .map_err(map_persistence_error)?;
        if total == 0 {
            return Ok(Page::empty());
        }
        let number = self.paginator.clamp(page, total);
        let offset = i64::try_from(self.paginator.offset(number))
            .map_err(|_| Error::internal("feed offset exceeds storage range"))?;
        let items = self
            .posts
            .list(filter, i64::from(self.paginator.per_page()), offset)
            .await
            .map_err(map_persistence_error)?;
        Ok(self.paginator.page(items, number, total))
    }
}

#[async_trait]
impl<P, G, U, F> FeedQuery for FeedService<P, G, U, F>
where
    P: PostRepository,
    G: GroupRepository,
    U: UserRepository,
    F: FollowRepository,
{
    async fn global_feed(&self, page: PageRequest) -> Result<Page<Post>, Error> {
        self.paged(&FeedFilter::All, page).await
    }

    async fn group_feed(&self, slug: &GroupSlug, page: PageRequest) -> Result<GroupFeed, Error> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no group with slug {slug}")))?;
        let feed = self.paged(&FeedFilter::Group(group.id()), page).await?;
        Ok(GroupFeed { group, page: feed })
    }

    async fn profile_feed(
        &self,
        username: &Username,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<ProfileFeed, Error> {
        let author = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no user named {username}")))?;
        let filter = FeedFilter::Author(author.id());
        let post_count = self
            .posts
            .count(&filter)
            .await
            .map_err(map_persistence_error)?;
        let viewer_follows = match viewer {
            Some(viewer_id) => self
                .follows
                .exists(viewer_id, author.id())
                .await
                .map_err(map_persistence_error)?,
            None => false,
        };
        let feed = self.paged(&filter, page).await?;
        Ok(ProfileFeed {
            author,
            page: feed,
            post_count,
            viewer_follows,
        })
    }

    async fn follow_feed(&self, viewer: UserId, page: PageRequest) -> Result<Page<Post>, Error> {
        self.paged(&FeedFilter::FollowedBy(viewer), page).await
    }
}
