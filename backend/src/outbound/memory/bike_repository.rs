//! In-memory `BikeRepository` adapter.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Bike;
use crate::domain::ports::{
    AvailabilityWrite, BikeFilter, BikeRepository, BikeRepositoryError,
};

/// Map-backed bike store. The `RwLock` gives the conditional availability
/// write the same atomicity the SQL adapter gets from a conditional UPDATE.
#[derive(Default)]
pub struct InMemoryBikeRepository {
    // Insertion order doubles as listing order (newest first on read).
    bikes: RwLock<Vec<(Uuid, Bike)>>,
}

impl InMemoryBikeRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<(Uuid, Bike)>> {
        self.bikes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<(Uuid, Bike)>> {
        self.bikes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn matches(filter: &BikeFilter, bike: &Bike) -> bool {
    if filter.only_available && !bike.is_available() {
        return false;
    }
    filter.category.is_none_or(|category| bike.category() == category)
}

#[async_trait]
impl BikeRepository for InMemoryBikeRepository {
    async fn insert(&self, bike: &Bike) -> Result<(), BikeRepositoryError> {
        let mut bikes = self.write();
        if bikes.iter().any(|(id, _)| *id == bike.id()) {
            return Err(BikeRepositoryError::query(format!(
                "duplicate bike id {}",
                bike.id()
            )));
        }
        bikes.push((bike.id(), bike.clone()));
        Ok(())
    }

    async fn update(&self, bike: &Bike) -> Result<bool, BikeRepositoryError> {
        let mut bikes = self.write();
        match bikes.iter_mut().find(|(id, _)| *id == bike.id()) {
            Some((_, stored)) => {
                *stored = bike.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, bike_id: &Uuid) -> Result<bool, BikeRepositoryError> {
        let mut bikes = self.write();
        let before = bikes.len();
        bikes.retain(|(id, _)| id != bike_id);
        Ok(bikes.len() < before)
    }

    async fn find_by_id(&self, bike_id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError> {
        Ok(self
            .read()
            .iter()
            .find(|(id, _)| id == bike_id)
            .map(|(_, bike)| bike.clone()))
    }

    async fn list(&self, filter: &BikeFilter) -> Result<Vec<Bike>, BikeRepositoryError> {
        Ok(self
            .read()
            .iter()
            .rev()
            .filter(|(_, bike)| matches(filter, bike))
            .map(|(_, bike)| bike.clone())
            .collect())
    }

    async fn compare_and_set_available(
        &self,
        bike_id: &Uuid,
        expected: bool,
        available: bool,
    ) -> Result<AvailabilityWrite, BikeRepositoryError> {
        let mut bikes = self.write();
        let Some((_, bike)) = bikes.iter_mut().find(|(id, _)| id == bike_id) else {
            return Ok(AvailabilityWrite::Missing);
        };
        if bike.is_available() != expected {
            return Ok(AvailabilityWrite::Raced);
        }
        *bike = bike.clone().with_availability(available);
        Ok(AvailabilityWrite::Applied)
    }

    async fn set_available(
        &self,
        bike_id: &Uuid,
        available: bool,
    ) -> Result<bool, BikeRepositoryError> {
        let mut bikes = self.write();
        match bikes.iter_mut().find(|(id, _)| id == bike_id) {
            Some((_, bike)) => {
                *bike = bike.clone().with_availability(available);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the conditional write.

    use super::*;
    use crate::domain::{BikeCategory, BikeDraft};

    fn sample_bike() -> Bike {
        Bike::new(BikeDraft::listed(
            "Yamaha MT-07".to_owned(),
            BikeCategory::Naked,
            1200,
            "Approachable twin".to_owned(),
        ))
        .expect("valid draft")
    }

    #[tokio::test]
    async fn conditional_write_applies_once() {
        let repo = InMemoryBikeRepository::new();
        let bike = sample_bike();
        repo.insert(&bike).await.expect("insert succeeds");

        let first = repo
            .compare_and_set_available(&bike.id(), true, false)
            .await
            .expect("write succeeds");
        let second = repo
            .compare_and_set_available(&bike.id(), true, false)
            .await
            .expect("write succeeds");

        assert_eq!(first, AvailabilityWrite::Applied);
        assert_eq!(second, AvailabilityWrite::Raced);
    }

    #[tokio::test]
    async fn list_filters_by_category_and_availability() {
        let repo = InMemoryBikeRepository::new();
        let bike = sample_bike();
        repo.insert(&bike).await.expect("insert succeeds");
        repo.set_available(&bike.id(), false)
            .await
            .expect("set succeeds");

        let available_only = repo
            .list(&BikeFilter {
                category: None,
                only_available: true,
            })
            .await
            .expect("list succeeds");
        assert!(available_only.is_empty());

        let naked = repo
            .list(&BikeFilter {
                category: Some(BikeCategory::Naked),
                only_available: false,
            })
            .await
            .expect("list succeeds");
        assert_eq!(naked.len(), 1);
    }
}
