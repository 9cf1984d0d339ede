//! Credential verification against the `users` table.
//!
//! Passwords are stored as Argon2 hashes in PHC string format. Unknown
//! usernames and wrong passwords collapse into the same error so a login
//! form cannot be used to enumerate accounts.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{LoginError, LoginService};
use crate::domain::{User, UserId, Username};

use super::models::CredentialRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`LoginService`] port.
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    /// Create a new login service with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, LoginError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LoginError::unavailable(err.to_string()))?;

        let row: Option<CredentialRow> = users::table
            .filter(users::username.eq(username))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| LoginError::unavailable(err.to_string()))?;

        let Some(row) = row else {
            return Err(LoginError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&row.password_hash).map_err(|err| {
            warn!(username, error = %err, "stored password hash unparseable");
            LoginError::InvalidCredentials
        })?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| LoginError::InvalidCredentials)?;

        let handle = Username::new(row.username).map_err(|err| {
            warn!(username, error = %err, "stored username invalid");
            LoginError::InvalidCredentials
        })?;
        Ok(User::new(UserId::from_uuid(row.id), handle))
    }
}
