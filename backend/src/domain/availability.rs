//! Availability ledger: the single source of truth for "can this bike be
//! rented right now".
//!
//! The ledger performs no cross-entity checks — enforcing "unavailable iff
//! an active rental exists" is the coordinator's job. What the ledger does
//! own is lost-update detection on the flag itself: the claim path is a
//! conditional write, so of two racing claims exactly one applies.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{AvailabilityWrite, BikeRepository, BikeRepositoryError};

fn map_repository_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
    }
}

/// Ledger over the bike repository's availability flag.
#[derive(Clone)]
pub struct AvailabilityLedger<R> {
    bikes: Arc<R>,
}

impl<R> AvailabilityLedger<R>
where
    R: BikeRepository,
{
    /// Create a ledger over the given repository.
    pub fn new(bikes: Arc<R>) -> Self {
        Self { bikes }
    }

    /// Whether the bike can be rented right now. `NotFound` when unknown.
    pub async fn is_available(&self, bike_id: &Uuid) -> Result<bool, Error> {
        let bike = self
            .bikes
            .find_by_id(bike_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bike {bike_id} not found")))?;
        Ok(bike.is_available())
    }

    /// Claim the bike: available → unavailable.
    ///
    /// `Conflict` when the bike is already unavailable — including when a
    /// concurrent claim got there first. `NotFound` when unknown.
    pub async fn mark_unavailable(&self, bike_id: &Uuid) -> Result<(), Error> {
        match self
            .bikes
            .compare_and_set_available(bike_id, true, false)
            .await
            .map_err(map_repository_error)?
        {
            AvailabilityWrite::Applied => Ok(()),
            AvailabilityWrite::Raced => Err(Error::conflict(format!(
                "bike {bike_id} is already claimed"
            ))),
            AvailabilityWrite::Missing => {
                Err(Error::not_found(format!("bike {bike_id} not found")))
            }
        }
    }

    /// Release the bike: unavailable → available.
    ///
    /// Idempotent — releasing an already-available bike succeeds, so the
    /// return path can always converge on "available". `NotFound` when
    /// unknown.
    pub async fn mark_available(&self, bike_id: &Uuid) -> Result<(), Error> {
        let updated = self
            .bikes
            .set_available(bike_id, true)
            .await
            .map_err(map_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("bike {bike_id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Ledger behaviour against a mocked repository.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockBikeRepository;

    #[tokio::test]
    async fn is_available_rejects_unknown_bike() {
        let mut bikes = MockBikeRepository::new();
        bikes.expect_find_by_id().return_once(|_| Ok(None));

        let ledger = AvailabilityLedger::new(Arc::new(bikes));
        let err = ledger
            .is_available(&Uuid::new_v4())
            .await
            .expect_err("unknown bike");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn mark_unavailable_applies_the_conditional_write() {
        let mut bikes = MockBikeRepository::new();
        bikes
            .expect_compare_and_set_available()
            .withf(|_, expected, available| *expected && !*available)
            .return_once(|_, _, _| Ok(AvailabilityWrite::Applied));

        let ledger = AvailabilityLedger::new(Arc::new(bikes));
        ledger
            .mark_unavailable(&Uuid::new_v4())
            .await
            .expect("claim applies");
    }

    #[tokio::test]
    async fn mark_unavailable_surfaces_conflict_on_raced_claim() {
        let mut bikes = MockBikeRepository::new();
        bikes
            .expect_compare_and_set_available()
            .return_once(|_, _, _| Ok(AvailabilityWrite::Raced));

        let ledger = AvailabilityLedger::new(Arc::new(bikes));
        let err = ledger
            .mark_unavailable(&Uuid::new_v4())
            .await
            .expect_err("raced claim");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn mark_available_is_idempotent() {
        let mut bikes = MockBikeRepository::new();
        // The unconditional write succeeds whether or not the flag already
        // reads true; the ledger treats both as success.
        bikes
            .expect_set_available()
            .times(2)
            .returning(|_, _| Ok(true));

        let ledger = AvailabilityLedger::new(Arc::new(bikes));
        let bike_id = Uuid::new_v4();
        ledger.mark_available(&bike_id).await.expect("first release");
        ledger
            .mark_available(&bike_id)
            .await
            .expect("second release is a no-op");
    }

    #[tokio::test]
    async fn connection_errors_map_to_service_unavailable() {
        let mut bikes = MockBikeRepository::new();
        bikes
            .expect_set_available()
            .return_once(|_, _| Err(BikeRepositoryError::connection("pool exhausted")));

        let ledger = AvailabilityLedger::new(Arc::new(bikes));
        let err = ledger
            .mark_available(&Uuid::new_v4())
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
