//! Driving ports for catalogue reads and admin inventory management.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bike, BikeCategory, BikeDraft, Error};

use super::BikeFilter;

/// Attribute edits for an existing bike.
///
/// Availability is deliberately absent: the coordinator owns that flag, and
/// letting an admin edit flip it would break the availability invariant.
#[derive(Debug, Clone, Default)]
pub struct BikeChanges {
    pub name: Option<String>,
    pub category: Option<BikeCategory>,
    pub price_per_hour_cents: Option<i64>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub location: Option<String>,
    pub image: Option<String>,
}

/// Driving port for catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeQuery: Send + Sync {
    /// List bikes matching the filter, newest listing first.
    async fn list_bikes(&self, filter: BikeFilter) -> Result<Vec<Bike>, Error>;

    /// Fetch one bike; `NotFound` when the id is unknown.
    async fn get_bike(&self, bike_id: &Uuid) -> Result<Bike, Error>;
}

/// Driving port for admin inventory mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeCommand: Send + Sync {
    /// List a new bike.
    async fn create_bike(&self, draft: BikeDraft) -> Result<Bike, Error>;

    /// Apply attribute edits; `NotFound` when the id is unknown.
    async fn update_bike(&self, bike_id: &Uuid, changes: BikeChanges) -> Result<Bike, Error>;

    /// Delete a bike. Rejected with `Conflict` while a rental holds it.
    async fn delete_bike(&self, bike_id: &Uuid) -> Result<(), Error>;
}
