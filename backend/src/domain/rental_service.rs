//! Rental consistency coordinator.
//!
//! [`RentalService`] is the only writer of cross-entity state: every rent,
//! return, or cancel touches both the bike's availability flag and a rental
//! record, and must look atomic to callers. Two mechanisms uphold that:
//!
//! - Mutual-exclusion scopes keyed by user id (rent) and bike id
//!   (rent/return/cancel), held for the duration of the compound operation.
//!   These close the "two requests for the same user both pass the
//!   active-rental check" race in a single-process deployment.
//! - The ledger's conditional availability write, which catches claims that
//!   race across processes sharing one store.
//!
//! Partial failures follow a fixed policy: a failed rental insert after a
//! successful claim reverts the claim (compensating action); a failed
//! release after a completed rental never reopens the billed rental —
//! the release is retried with bounded backoff and, on exhaustion, logged
//! as an operator-visible inconsistency. A stuck "unavailable" bike is
//! fixable; double-billing is not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::ports::{
    BikeRepository, BikeRepositoryError, PaymentGateway, RentalCommand, RentalFilter, RentalQuery,
    RentalRepository, RentalRepositoryError,
};
use crate::domain::{
    AvailabilityLedger, Error, ErrorCode, PaymentStatus, Rental, RentalStatus, UserId,
};

/// Release retry schedule: first delay, doubled per attempt.
const RELEASE_RETRY_ATTEMPTS: u32 = 4;
const RELEASE_RETRY_BASE: Duration = Duration::from_millis(50);

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

/// Per-key mutual-exclusion scopes.
///
/// Lock handles are created lazily and retained for the process lifetime;
/// the map is bounded by the fleet and user population.
#[derive(Default)]
struct KeyedLocks {
    inner: StdMutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    fn handle(&self, key: Uuid) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(map.entry(key).or_default())
    }
}

/// Reverts a claimed bike if the rent operation is abandoned mid-flight.
///
/// Cancellation of the calling future between the availability claim and
/// rental persistence must not skip cleanup, so the revert runs from `Drop`
/// on a detached task. The happy path and the handled error path disarm the
/// guard and release explicitly instead.
struct ClaimGuard<B: BikeRepository + 'static> {
    claim: Option<(Arc<B>, Uuid)>,
}

impl<B: BikeRepository + 'static> ClaimGuard<B> {
    fn armed(bikes: Arc<B>, bike_id: Uuid) -> Self {
        Self {
            claim: Some((bikes, bike_id)),
        }
    }

    fn disarm(&mut self) {
        self.claim = None;
    }
}

impl<B: BikeRepository + 'static> Drop for ClaimGuard<B> {
    fn drop(&mut self) {
        let Some((bikes, bike_id)) = self.claim.take() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            error!(%bike_id, "no runtime to revert abandoned claim; bike left unavailable");
            return;
        };
        handle.spawn(async move {
            if let Err(err) = bikes.set_available(&bike_id, true).await {
                error!(%bike_id, error = %err, "failed to revert abandoned claim; bike left unavailable");
            } else {
                warn!(%bike_id, "reverted availability claim for abandoned rent operation");
            }
        });
    }
}

/// Coordinator implementing the rental driving ports.
pub struct RentalService<B: BikeRepository + 'static, R> {
    ledger: AvailabilityLedger<B>,
    bikes: Arc<B>,
    rentals: Arc<R>,
    payments: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    user_locks: KeyedLocks,
    bike_locks: KeyedLocks,
}

impl<B, R> RentalService<B, R>
where
    B: BikeRepository + 'static,
    R: RentalRepository,
{
    /// Create a coordinator over the given repositories and collaborators.
    pub fn new(
        bikes: Arc<B>,
        rentals: Arc<R>,
        payments: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger: AvailabilityLedger::new(Arc::clone(&bikes)),
            bikes,
            rentals,
            payments,
            clock,
            user_locks: KeyedLocks::default(),
            bike_locks: KeyedLocks::default(),
        }
    }

    /// Read access to the ledger, for adapters that only need availability.
    pub fn ledger(&self) -> &AvailabilityLedger<B> {
        &self.ledger
    }

    async fn reject_if_user_has_active_rental(&self, user_id: &UserId) -> Result<(), Error> {
        if let Some(active) = self
            .rentals
            .find_active_for_user(user_id)
            .await
            .map_err(map_rental_repository_error)?
        {
            return Err(Error::conflict(
                "you already have an active rental; return it first",
            )
            .with_details(serde_json::json!({ "activeRentalId": active.id() })));
        }
        Ok(())
    }

    /// Revert a claim after a failed rental insert, surfacing `cause`.
    async fn revert_claim(&self, bike_id: Uuid, cause: Error) -> Error {
        if self.release_with_retry(bike_id).await {
            warn!(%bike_id, "reverted availability claim after failed rental insert");
        }
        cause
    }

    /// Release a bike, retrying transient store failures with bounded
    /// exponential backoff plus jitter. Returns whether the flag converged.
    async fn release_with_retry(&self, bike_id: Uuid) -> bool {
        let mut delay = RELEASE_RETRY_BASE;
        let mut rng = SmallRng::from_entropy();
        for attempt in 1..=RELEASE_RETRY_ATTEMPTS {
            match self.ledger.mark_available(&bike_id).await {
                Ok(()) => return true,
                Err(err) if err.code() == ErrorCode::ServiceUnavailable
                    && attempt < RELEASE_RETRY_ATTEMPTS =>
                {
                    let jitter = Duration::from_millis(rng.gen_range(0..=delay.as_millis() as u64 / 2));
                    warn!(
                        %bike_id,
                        attempt,
                        error = %err,
                        "transient failure releasing bike; backing off"
                    );
                    tokio::time::sleep(delay + jitter).await;
                    delay *= 2;
                }
                Err(err) => {
                    error!(
                        %bike_id,
                        error = %err,
                        "bike left unavailable with no active rental; operator intervention required"
                    );
                    return false;
                }
            }
        }
        false
    }

    /// Shared lookup for return/cancel: the rental must exist, belong to the
    /// caller, and be active. Anything else reads as `NotFound`, matching
    /// the ownership check (the caller learns nothing about other users'
    /// rentals).
    async fn find_active_owned(
        &self,
        user_id: &UserId,
        rental_id: &Uuid,
    ) -> Result<Rental, Error> {
        let rental = self
            .rentals
            .find_by_id(rental_id)
            .await
            .map_err(map_rental_repository_error)?;
        match rental {
            Some(rental) if rental.user_id() == user_id && rental.is_active() => Ok(rental),
            _ => Err(Error::not_found("active rental not found")),
        }
    }

    async fn settle_payment(&self, rental: &mut Rental) {
        match self.payments.charge(rental).await {
            Ok(outcome) => rental.record_payment(outcome),
            Err(err) => {
                warn!(rental_id = %rental.id(), error = %err, "payment gateway failed; recording failed payment");
                rental.record_payment(PaymentStatus::Failed);
            }
        }
    }

    /// Persist a closed rental and release its bike.
    ///
    /// The rental is already terminal when this runs; a failed release never
    /// rolls that back.
    async fn persist_closed_and_release(&self, rental: Rental) -> Result<Rental, Error> {
        let updated = self
            .rentals
            .update(&rental)
            .await
            .map_err(map_rental_repository_error)?;
        if !updated {
            return Err(Error::internal(format!(
                "rental {} vanished during close",
                rental.id()
            )));
        }
        self.release_with_retry(rental.bike_id()).await;
        Ok(rental)
    }
}

#[async_trait]
impl<B, R> RentalCommand for RentalService<B, R>
where
    B: BikeRepository + 'static,
    R: RentalRepository,
{
    async fn rent_bike(&self, user_id: &UserId, bike_id: &Uuid) -> Result<Rental, Error> {
        // Lock order is user then bike, everywhere, so the scopes compose
        // without deadlock.
        let user_handle = self.user_locks.handle(*user_id.as_uuid());
        let _user_scope = user_handle.lock().await;
        let bike_handle = self.bike_locks.handle(*bike_id);
        let _bike_scope = bike_handle.lock().await;

        self.reject_if_user_has_active_rental(user_id).await?;

        let bike = self
            .bikes
            .find_by_id(bike_id)
            .await
            .map_err(map_bike_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bike {bike_id} not found")))?;
        if !bike.is_available() {
            return Err(Error::unavailable("bike is not available for rent"));
        }

        // Claim the bike. A raced claim aborts before any rental exists.
        self.ledger.mark_unavailable(bike_id).await?;
        let mut claim = ClaimGuard::armed(Arc::clone(&self.bikes), *bike_id);

        let rental = Rental::open(*user_id, *bike_id, self.clock.utc());
        match self.rentals.insert(&rental).await {
            Ok(()) => {
                claim.disarm();
                Ok(rental)
            }
            Err(err) => {
                claim.disarm();
                Err(self
                    .revert_claim(*bike_id, map_rental_repository_error(err))
                    .await)
            }
        }
    }

    async fn return_bike(&self, user_id: &UserId, rental_id: &Uuid) -> Result<Rental, Error> {
        let probe = self.find_active_owned(user_id, rental_id).await?;
        let bike_handle = self.bike_locks.handle(probe.bike_id());
        let _bike_scope = bike_handle.lock().await;

        // Re-read under the bike scope; a concurrent return may have won.
        let mut rental = self.find_active_owned(user_id, rental_id).await?;

        let bike = self
            .bikes
            .find_by_id(&rental.bike_id())
            .await
            .map_err(map_bike_repository_error)?
            .ok_or_else(|| {
                error!(rental_id = %rental.id(), bike_id = %rental.bike_id(), "active rental references missing bike");
                Error::internal("rented bike no longer exists")
            })?;

        // Billed at the bike's current rate, captured now.
        rental
            .close(self.clock.utc(), bike.price_per_hour_cents())
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.settle_payment(&mut rental).await;

        self.persist_closed_and_release(rental).await
    }

    async fn cancel_rental(&self, user_id: &UserId, rental_id: &Uuid) -> Result<Rental, Error> {
        let probe = self.find_active_owned(user_id, rental_id).await?;
        let bike_handle = self.bike_locks.handle(probe.bike_id());
        let _bike_scope = bike_handle.lock().await;

        let mut rental = self.find_active_owned(user_id, rental_id).await?;
        rental
            .cancel(self.clock.utc())
            .map_err(|err| Error::invalid_state(err.to_string()))?;

        self.persist_closed_and_release(rental).await
    }
}

#[async_trait]
impl<B, R> RentalQuery for RentalService<B, R>
where
    B: BikeRepository + 'static,
    R: RentalRepository,
{
    async fn my_rentals(
        &self,
        user_id: &UserId,
        status: Option<RentalStatus>,
    ) -> Result<Vec<Rental>, Error> {
        self.rentals
            .list(&RentalFilter {
                status,
                user_id: Some(*user_id),
            })
            .await
            .map_err(map_rental_repository_error)
    }

    async fn list_rentals(&self, filter: RentalFilter) -> Result<Vec<Rental>, Error> {
        self.rentals
            .list(&filter)
            .await
            .map_err(map_rental_repository_error)
    }
}

#[cfg(test)]
#[path = "rental_service_tests.rs"]
mod tests;
