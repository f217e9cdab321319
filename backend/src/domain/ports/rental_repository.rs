//! Port for rental record persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Rental, RentalStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rental repository adapters.
    pub enum RentalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "rental repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "rental repository query failed: {message}",
    }
}

/// Listing filter for rental history queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RentalFilter {
    /// Restrict to one lifecycle status.
    pub status: Option<RentalStatus>,
    /// Restrict to one user's rentals.
    pub user_id: Option<UserId>,
}

/// Port for writing and reading rental records.
///
/// Rentals are history: there is deliberately no delete operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Persist a newly opened rental.
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError>;

    /// Replace a rental's mutable attributes (status, end, cost, payment).
    /// Returns `false` when the id is unknown.
    async fn update(&self, rental: &Rental) -> Result<bool, RentalRepositoryError>;

    /// Find a rental by id.
    async fn find_by_id(&self, rental_id: &Uuid) -> Result<Option<Rental>, RentalRepositoryError>;

    /// Find the user's active rental, if any. Backs the
    /// one-active-rental-per-user check.
    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Rental>, RentalRepositoryError>;

    /// List rentals matching the filter, newest first.
    async fn list(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RentalRepositoryError>;
}
