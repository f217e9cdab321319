//! Domain entities, lifecycle services, and ports.
//!
//! Purpose: define the strongly typed rental-domain model (bikes, rentals,
//! users) and the services that own its invariants. Keep entity mutation
//! behind validated constructors and state-machine methods, and document the
//! invariants in each type's Rustdoc.
//!
//! The load-bearing pieces are:
//! - [`AvailabilityLedger`] — single source of truth for "can this bike be
//!   rented right now".
//! - [`Rental`] — the per-rental state machine (`Active` → `Completed` or
//!   `Cancelled`) and its billing rule.
//! - [`RentalService`] — the coordinator that makes rent/return atomic across
//!   both entities and enforces one active rental per user.

pub mod auth;
pub mod availability;
pub mod bike;
pub mod bike_service;
pub mod dashboard;
pub mod error;
pub mod ports;
pub mod rental;
pub mod rental_service;
pub mod trace_id;
pub mod user;

pub use self::auth::AuthService;
pub use self::availability::AvailabilityLedger;
pub use self::bike::{Bike, BikeCategory, BikeDraft, BikeValidationError};
pub use self::bike_service::BikeCatalogueService;
pub use self::dashboard::{
    CategoryBreakdown, DashboardOverview, DashboardService, DashboardStats, RevenueSummary,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::rental::{
    Rental, RentalDraft, RentalStatus, RentalValidationError, PaymentStatus, billable_hours,
};
pub use self::rental_service::RentalService;
pub use self::trace_id::TraceId;
pub use self::user::{Role, User, UserDraft, UserId, UserValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
