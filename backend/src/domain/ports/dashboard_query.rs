//! Driving port for the admin dashboard rollup.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error};

/// Read-only aggregate statistics over the store. No lifecycle logic lives
/// behind this port; it is a consumer of the core's data shape.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Compute the current dashboard snapshot.
    async fn stats(&self) -> Result<DashboardStats, Error>;
}
