//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRecord, UserRepository, UserRepositoryError};
use crate::domain::{Role, User, UserDraft, UserId};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|err: crate::domain::UserValidationError| {
            UserRepositoryError::query(err.to_string())
        })?;
    User::new(UserDraft {
        id: UserId::from_uuid(row.id),
        name: row.name.clone(),
        email: row.email.clone(),
        phone: row.phone.clone(),
        role,
    })
    .map_err(|err| UserRepositoryError::query(err.to_string()))
}

fn row_to_record(row: UserRow) -> Result<UserRecord, UserRepositoryError> {
    let user = row_to_user(&row)?;
    Ok(UserRecord {
        user,
        password_digest: row.password_digest,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &record.user;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name(),
            email: user.email(),
            phone: user.phone(),
            role: user.role().to_string(),
            password_digest: &record.password_digest,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                // The unique index on email backs the duplicate-account rule.
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserRepositoryError::duplicate_email(user.email())
                }
                other => map_diesel_error(other),
            })?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(user_id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
