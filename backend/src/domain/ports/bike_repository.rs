//! Port for bike catalogue persistence.
//!
//! The conditional availability write is the storage half of the lost-update
//! defence: `compare_and_set_available` only flips the flag when the current
//! value matches the caller's expectation, so two racing rent attempts cannot
//! both claim the same bike even across processes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bike, BikeCategory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bike repository adapters.
    pub enum BikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bike repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bike repository query failed: {message}",
    }
}

/// Listing filter for the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BikeFilter {
    /// Restrict to one category.
    pub category: Option<BikeCategory>,
    /// Restrict to bikes currently available for rent.
    pub only_available: bool,
}

/// Outcome of a conditional availability write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityWrite {
    /// The flag matched the expectation and was flipped.
    Applied,
    /// The bike exists but the flag did not match the expectation.
    Raced,
    /// No bike with that id.
    Missing,
}

/// Port for bike reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// Persist a new bike.
    async fn insert(&self, bike: &Bike) -> Result<(), BikeRepositoryError>;

    /// Replace a bike's attributes. Returns `false` when the id is unknown.
    ///
    /// The availability flag is written as carried by `bike`; callers other
    /// than the ledger must pass the stored value through unchanged.
    async fn update(&self, bike: &Bike) -> Result<bool, BikeRepositoryError>;

    /// Delete a bike. Returns `false` when the id is unknown.
    async fn delete(&self, bike_id: &Uuid) -> Result<bool, BikeRepositoryError>;

    /// Find a bike by id.
    async fn find_by_id(&self, bike_id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError>;

    /// List bikes matching the filter, newest listing first.
    async fn list(&self, filter: &BikeFilter) -> Result<Vec<Bike>, BikeRepositoryError>;

    /// Flip the availability flag only when it currently equals `expected`.
    async fn compare_and_set_available(
        &self,
        bike_id: &Uuid,
        expected: bool,
        available: bool,
    ) -> Result<AvailabilityWrite, BikeRepositoryError>;

    /// Set the availability flag unconditionally. Returns `false` when the
    /// id is unknown. Used by the idempotent release path.
    async fn set_available(
        &self,
        bike_id: &Uuid,
        available: bool,
    ) -> Result<bool, BikeRepositoryError>;
}
