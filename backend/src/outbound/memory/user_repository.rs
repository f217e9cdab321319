//! In-memory `UserRepository` adapter.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserRecord, UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

/// Vec-backed account store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<UserRecord>> {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<UserRecord>> {
        self.records
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserRepositoryError> {
        let mut records = self.write();
        if records
            .iter()
            .any(|stored| stored.user.email() == record.user.email())
        {
            return Err(UserRepositoryError::duplicate_email(record.user.email()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .read()
            .iter()
            .find(|record| record.user.id() == user_id)
            .map(|record| record.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        Ok(self
            .read()
            .iter()
            .find(|record| record.user.email() == email)
            .cloned())
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(self.read().len() as u64)
    }
}
