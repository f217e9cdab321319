//! Process-local repository adapters.
//!
//! These back the server when no database is configured (tests, demos) and
//! the domain concurrency tests. They honour the same contracts as the
//! Diesel adapters, including the conditional availability write.

mod bike_repository;
mod rental_repository;
mod user_repository;

pub use bike_repository::InMemoryBikeRepository;
pub use rental_repository::InMemoryRentalRepository;
pub use user_repository::InMemoryUserRepository;
