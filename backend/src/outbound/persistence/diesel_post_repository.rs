//! PostgreSQL-backed [`PostRepository`] implementation using Diesel.
//!
//! Every listing joins the author row and left-joins the group row so the
//! feeds render without per-post lookups. The follow filter resolves
//! through a subquery on the follow edges rather than materialising the
//! author set in application code.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FeedFilter, PersistenceError, PostRepository};
use crate::domain::{MediaPath, NewPost, Post, PostChanges, PostId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{GroupRow, NewPostRow, PostRow, UserRow};
use super::pool::DbPool;
use super::schema::{follows, groups, posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Post>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(PostRow, UserRow, Option<GroupRow>)> = posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .filter(posts::id.eq(id))
            .select((
                PostRow::as_select(),
                UserRow::as_select(),
                Option::<GroupRow>::as_select(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(post, author, group)| post.into_domain(author, group))
            .transpose()
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, new_post: &NewPost) -> Result<Post, PersistenceError> {
        let id = Uuid::new_v4();
        let row = NewPostRow {
            id,
            text: new_post.text.as_str(),
            author_id: *new_post.author.as_uuid(),
            group_id: new_post.group.map(|group| *group.as_uuid()),
            image: new_post.image.as_ref().map(MediaPath::as_str),
        };

        {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::insert_into(posts::table)
                .values(&row)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }

        self.fetch(id)
            .await?
            .ok_or_else(|| PersistenceError::query("inserted post vanished"))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PersistenceError> {
        self.fetch(*id.as_uuid()).await
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Post, PersistenceError> {
        let uuid = *id.as_uuid();
        {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            // One statement for the whole edit; a cleared group becomes NULL
            // and an absent image keeps the stored value.
            let text = posts::text.eq(changes.text.as_str());
            let group_id = posts::group_id.eq(changes.group.map(|group| *group.as_uuid()));
            match &changes.image {
                Some(image) => {
                    diesel::update(posts::table.find(uuid))
                        .set((text, group_id, posts::image.eq(image.as_str())))
                        .execute(&mut conn)
                        .await
                        .map_err(map_diesel_error)?;
                }
                None => {
                    diesel::update(posts::table.find(uuid))
                        .set((text, group_id))
                        .execute(&mut conn)
                        .await
                        .map_err(map_diesel_error)?;
                }
            }
        }

        self.fetch(uuid)
            .await?
            .ok_or_else(|| PersistenceError::query("updated post vanished"))
    }

    async fn count(&self, filter: &FeedFilter) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = posts::table.into_boxed();
        query = match filter {
            FeedFilter::All => query,
            FeedFilter::Group(group) => query.filter(posts::group_id.eq(*group.as_uuid())),
            FeedFilter::Author(author) => query.filter(posts::author_id.eq(*author.as_uuid())),
            FeedFilter::FollowedBy(user) => {
                let followed = follows::table
                    .filter(follows::user_id.eq(*user.as_uuid()))
                    .select(follows::author_id);
                query.filter(posts::author_id.eq_any(followed))
            }
        };
        let total: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total).map_err(|_| PersistenceError::query("negative row count"))
    }

    async fn list(
        &self,
        filter: &FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .select((
                PostRow::as_select(),
                UserRow::as_select(),
                Option::<GroupRow>::as_select(),
            ))
            .order((posts::pub_date.desc(), posts::id.desc()))
            .into_boxed();
        query = match filter {
            FeedFilter::All => query,
            FeedFilter::Group(group) => query.filter(posts::group_id.eq(*group.as_uuid())),
            FeedFilter::Author(author) => query.filter(posts::author_id.eq(*author.as_uuid())),
            FeedFilter::FollowedBy(user) => {
                let followed = follows::table
                    .filter(follows::user_id.eq(*user.as_uuid()))
                    .select(follows::author_id);
                query.filter(posts::author_id.eq_any(followed))
            }
        };

        let rows: Vec<(PostRow, UserRow, Option<GroupRow>)> = query
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(post, author, group)| post.into_domain(author, group))
            .collect()
    }
}
