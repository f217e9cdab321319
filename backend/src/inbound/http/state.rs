//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, BikeCommand, BikeQuery, DashboardQuery, RentalCommand, RentalQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub bike_query: Arc<dyn BikeQuery>,
    pub bike_command: Arc<dyn BikeCommand>,
    pub rental_command: Arc<dyn RentalCommand>,
    pub rental_query: Arc<dyn RentalQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
}
