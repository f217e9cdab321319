//! HTTP inbound adapter exposing REST endpoints.

pub mod bikes;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod rentals;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use crate::domain::ApiResult;
