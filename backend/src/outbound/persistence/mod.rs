//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin adapters only: each repository translates between Diesel row structs
//! and validated domain constructors. Row and schema types stay internal to
//! this module. Connections come from a `bb8` pool over `diesel-async`.

mod diesel_bike_repository;
mod diesel_rental_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bike_repository::DieselBikeRepository;
pub use diesel_rental_repository::DieselRentalRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, apply_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
