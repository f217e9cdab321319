//! Catalogue reads and admin inventory management.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    BikeChanges, BikeCommand, BikeFilter, BikeQuery, BikeRepository, BikeRepositoryError,
    RentalFilter, RentalRepository, RentalRepositoryError,
};
use crate::domain::{Bike, BikeDraft, Error, Rental, RentalStatus};

fn map_bike_repository_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
    }
}

fn map_rental_repository_error(error: RentalRepositoryError) -> Error {
    match error {
        RentalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rental repository unavailable: {message}"))
        }
        RentalRepositoryError::Query { message } => {
            Error::internal(format!("rental repository error: {message}"))
        }
    }
}

/// Catalogue service over the bike store.
///
/// Attribute edits and deletions consult the rental store so inventory
/// changes cannot contradict the availability invariant: the flag itself is
/// never editable here, and a bike a rider is out on cannot be deleted.
pub struct BikeCatalogueService<B, R> {
    bikes: Arc<B>,
    rentals: Arc<R>,
}

impl<B, R> BikeCatalogueService<B, R>
where
    B: BikeRepository,
    R: RentalRepository,
{
    /// Create a catalogue service over the given stores.
    pub fn new(bikes: Arc<B>, rentals: Arc<R>) -> Self {
        Self { bikes, rentals }
    }

    async fn require_bike(&self, bike_id: &Uuid) -> Result<Bike, Error> {
        self.bikes
            .find_by_id(bike_id)
            .await
            .map_err(map_bike_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bike {bike_id} not found")))
    }

    async fn active_rental_for_bike(&self, bike_id: &Uuid) -> Result<Option<Rental>, Error> {
        let active = self
            .rentals
            .list(&RentalFilter {
                status: Some(RentalStatus::Active),
                user_id: None,
            })
            .await
            .map_err(map_rental_repository_error)?;
        Ok(active.into_iter().find(|rental| rental.bike_id() == *bike_id))
    }
}

#[async_trait]
impl<B, R> BikeQuery for BikeCatalogueService<B, R>
where
    B: BikeRepository,
    R: RentalRepository,
{
    async fn list_bikes(&self, filter: BikeFilter) -> Result<Vec<Bike>, Error> {
        self.bikes
            .list(&filter)
            .await
            .map_err(map_bike_repository_error)
    }

    async fn get_bike(&self, bike_id: &Uuid) -> Result<Bike, Error> {
        self.require_bike(bike_id).await
    }
}

#[async_trait]
impl<B, R> BikeCommand for BikeCatalogueService<B, R>
where
    B: BikeRepository,
    R: RentalRepository,
{
    async fn create_bike(&self, draft: BikeDraft) -> Result<Bike, Error> {
        let bike = Bike::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.bikes
            .insert(&bike)
            .await
            .map_err(map_bike_repository_error)?;
        Ok(bike)
    }

    async fn update_bike(&self, bike_id: &Uuid, changes: BikeChanges) -> Result<Bike, Error> {
        let current = self.require_bike(bike_id).await?;
        // Rebuild through the validated constructor; availability carries
        // over unchanged from the stored row.
        let draft = BikeDraft {
            id: current.id(),
            name: changes.name.unwrap_or_else(|| current.name().to_owned()),
            category: changes.category.unwrap_or(current.category()),
            price_per_hour_cents: changes
                .price_per_hour_cents
                .unwrap_or(current.price_per_hour_cents()),
            available: current.is_available(),
            description: changes
                .description
                .unwrap_or_else(|| current.description().to_owned()),
            features: changes.features.unwrap_or_else(|| current.features().to_vec()),
            location: changes
                .location
                .unwrap_or_else(|| current.location().to_owned()),
            image: changes.image.unwrap_or_else(|| current.image().to_owned()),
        };
        let updated = Bike::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        let applied = self
            .bikes
            .update(&updated)
            .await
            .map_err(map_bike_repository_error)?;
        if applied {
            Ok(updated)
        } else {
            Err(Error::not_found(format!("bike {bike_id} not found")))
        }
    }

    async fn delete_bike(&self, bike_id: &Uuid) -> Result<(), Error> {
        self.require_bike(bike_id).await?;
        if let Some(rental) = self.active_rental_for_bike(bike_id).await? {
            return Err(Error::conflict(
                "bike has an active rental; wait for its return before deleting",
            )
            .with_details(serde_json::json!({ "activeRentalId": rental.id() })));
        }
        let deleted = self
            .bikes
            .delete(bike_id)
            .await
            .map_err(map_bike_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("bike {bike_id} not found")))
        }
    }
}

#[cfg(test)]
#[path = "bike_service_tests.rs"]
mod tests;
