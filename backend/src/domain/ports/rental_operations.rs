//! Driving ports for the rental lifecycle.
//!
//! `RentalCommand` is the public face of the consistency coordinator: each
//! method is a compound operation with all-or-nothing effect across the bike
//! and rental entities. `RentalQuery` covers the read-only listings, which
//! take no locks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Rental, UserId};

use super::RentalFilter;

/// Driving port for rental state transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalCommand: Send + Sync {
    /// Rent `bike_id` for `user_id`.
    ///
    /// Rejects with `Conflict` when the user already holds an active rental
    /// or the flip raced another operation, `NotFound` when the bike is
    /// unknown, and `Unavailable` when the bike is not rentable.
    async fn rent_bike(&self, user_id: &UserId, bike_id: &Uuid) -> Result<Rental, Error>;

    /// Return the rental, billing at the bike's current hourly rate.
    ///
    /// Rejects with `NotFound` unless the rental exists, belongs to
    /// `user_id`, and is active.
    async fn return_bike(&self, user_id: &UserId, rental_id: &Uuid) -> Result<Rental, Error>;

    /// Cancel the rental without billing, freeing the bike.
    ///
    /// Same lookup rules as [`RentalCommand::return_bike`].
    async fn cancel_rental(&self, user_id: &UserId, rental_id: &Uuid) -> Result<Rental, Error>;
}

/// Driving port for rental listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalQuery: Send + Sync {
    /// The user's own rentals, newest first.
    async fn my_rentals(
        &self,
        user_id: &UserId,
        status: Option<crate::domain::RentalStatus>,
    ) -> Result<Vec<Rental>, Error>;

    /// All rentals matching the filter, newest first. Admin surface.
    async fn list_rentals(&self, filter: RentalFilter) -> Result<Vec<Rental>, Error>;
}
