//! PostgreSQL-backed [`GroupRepository`] implementation using Diesel.
//!
//! Groups are read-only from the application's point of view; rows are
//! seeded by migrations or managed out of band.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupRepository, PersistenceError};
use crate::domain::{Group, GroupId, GroupSlug};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::GroupRow;
use super::pool::DbPool;
use super::schema::groups;

/// Diesel-backed implementation of the [`GroupRepository`] port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<GroupRow> = groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(GroupRow::into_domain).transpose()
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<GroupRow> = groups::table
            .find(id.as_uuid())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(GroupRow::into_domain).transpose()
    }

    async fn list(&self) -> Result<Vec<Group>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<GroupRow> = groups::table
            .order(groups::title.asc())
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(GroupRow::into_domain).collect()
    }
}
