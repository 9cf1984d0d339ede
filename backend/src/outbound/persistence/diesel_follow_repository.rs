//! PostgreSQL-backed [`FollowRepository`] implementation using Diesel.
//!
//! The composite primary key on `(user_id, author_id)` makes insertion
//! idempotent: `ON CONFLICT DO NOTHING` lets concurrent follows race
//! safely, and the affected-row count reports which caller won.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{FollowRepository, PersistenceError};

use super::error_map::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::follows;

/// Diesel-backed implementation of the [`FollowRepository`] port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(follows::table)
            .values((
                follows::user_id.eq(user.as_uuid()),
                follows::author_id.eq(author.as_uuid()),
            ))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted > 0)
    }

    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(user.as_uuid()))
                .filter(follows::author_id.eq(author.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::user_id.eq(user.as_uuid()))
                .filter(follows::author_id.eq(author.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
