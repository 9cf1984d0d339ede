//! PostgreSQL-backed [`CommentRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CommentRepository, PersistenceError};
use crate::domain::{Comment, NewComment, PostId};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow, UserRow};
use super::pool::DbPool;
use super::schema::{comments, users};

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, new_comment: &NewComment) -> Result<Comment, PersistenceError> {
        let id = Uuid::new_v4();
        let row = NewCommentRow {
            id,
            post_id: *new_comment.post.as_uuid(),
            author_id: *new_comment.author.as_uuid(),
            text: new_comment.text.as_str(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (comment, author): (CommentRow, UserRow) = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id))
            .select((CommentRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        comment.into_domain(author)
    }

    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(CommentRow, UserRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post.as_uuid()))
            .order(comments::created.asc())
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(comment, author)| comment.into_domain(author))
            .collect()
    }
}
