//! In-memory `RentalRepository` adapter.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{RentalFilter, RentalRepository, RentalRepositoryError};
use crate::domain::{Rental, UserId};

/// Vec-backed rental store; insertion order doubles as recency order.
#[derive(Default)]
pub struct InMemoryRentalRepository {
    rentals: RwLock<Vec<Rental>>,
}

impl InMemoryRentalRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Rental>> {
        self.rentals
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Rental>> {
        self.rentals
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn matches(filter: &RentalFilter, rental: &Rental) -> bool {
    filter.status.is_none_or(|status| rental.status() == status)
        && filter.user_id.is_none_or(|user_id| *rental.user_id() == user_id)
}

#[async_trait]
impl RentalRepository for InMemoryRentalRepository {
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut rentals = self.write();
        if rentals.iter().any(|stored| stored.id() == rental.id()) {
            return Err(RentalRepositoryError::query(format!(
                "duplicate rental id {}",
                rental.id()
            )));
        }
        rentals.push(rental.clone());
        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<bool, RentalRepositoryError> {
        let mut rentals = self.write();
        match rentals.iter_mut().find(|stored| stored.id() == rental.id()) {
            Some(stored) => {
                *stored = rental.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, rental_id: &Uuid) -> Result<Option<Rental>, RentalRepositoryError> {
        Ok(self
            .read()
            .iter()
            .find(|rental| rental.id() == *rental_id)
            .cloned())
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Rental>, RentalRepositoryError> {
        Ok(self
            .read()
            .iter()
            .find(|rental| rental.user_id() == user_id && rental.is_active())
            .cloned())
    }

    async fn list(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RentalRepositoryError> {
        Ok(self
            .read()
            .iter()
            .rev()
            .filter(|rental| matches(filter, rental))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::RentalStatus;

    #[tokio::test]
    async fn active_lookup_ignores_terminal_rentals() {
        let repo = InMemoryRentalRepository::new();
        let user_id = UserId::random();
        let mut first = Rental::open(user_id, Uuid::new_v4(), Utc::now());
        first.cancel(Utc::now()).expect("cancel succeeds");
        repo.insert(&first).await.expect("insert succeeds");

        assert!(repo
            .find_active_for_user(&user_id)
            .await
            .expect("lookup succeeds")
            .is_none());

        let second = Rental::open(user_id, Uuid::new_v4(), Utc::now());
        repo.insert(&second).await.expect("insert succeeds");

        let active = repo
            .find_active_for_user(&user_id)
            .await
            .expect("lookup succeeds")
            .expect("active rental present");
        assert_eq!(active.id(), second.id());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filterable() {
        let repo = InMemoryRentalRepository::new();
        let user_id = UserId::random();
        let first = Rental::open(user_id, Uuid::new_v4(), Utc::now());
        let second = Rental::open(UserId::random(), Uuid::new_v4(), Utc::now());
        repo.insert(&first).await.expect("insert succeeds");
        repo.insert(&second).await.expect("insert succeeds");

        let all = repo.list(&RentalFilter::default()).await.expect("list succeeds");
        assert_eq!(all.first().map(Rental::id), Some(second.id()));

        let mine = repo
            .list(&RentalFilter {
                status: Some(RentalStatus::Active),
                user_id: Some(user_id),
            })
            .await
            .expect("list succeeds");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine.first().map(Rental::id), Some(first.id()));
    }
}
