//! Domain ports: the seams between the rental core and its collaborators.
//!
//! Driving ports (commands/queries) are implemented by the services in
//! [`crate::domain`] and consumed by inbound adapters. Driven ports
//! (repositories, the payment gateway) are implemented under
//! [`crate::outbound`].

mod account_service;
mod bike_catalogue;
mod bike_repository;
mod dashboard_query;
mod macros;
mod payment_gateway;
mod rental_operations;
mod rental_repository;
mod user_repository;

pub(crate) use macros::define_port_error;

pub use account_service::{AccountService, Credentials, Registration};
pub use bike_catalogue::{BikeChanges, BikeCommand, BikeQuery};
pub use bike_repository::{AvailabilityWrite, BikeFilter, BikeRepository, BikeRepositoryError};
pub use dashboard_query::DashboardQuery;
pub use payment_gateway::{AlwaysApprovePaymentGateway, PaymentGateway, PaymentGatewayError};
pub use rental_operations::{RentalCommand, RentalQuery};
pub use rental_repository::{RentalFilter, RentalRepository, RentalRepositoryError};
pub use user_repository::{UserRecord, UserRepository, UserRepositoryError};

#[cfg(test)]
pub use account_service::MockAccountService;
#[cfg(test)]
pub use bike_catalogue::{MockBikeCommand, MockBikeQuery};
#[cfg(test)]
pub use bike_repository::MockBikeRepository;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
#[cfg(test)]
pub use rental_operations::{MockRentalCommand, MockRentalQuery};
#[cfg(test)]
pub use rental_repository::MockRentalRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
