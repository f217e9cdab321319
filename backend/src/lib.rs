//! MotoRent backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities,
//! lifecycle services, and ports; `inbound` adapts HTTP traffic onto the
//! driving ports; `outbound` implements the driven ports against PostgreSQL
//! or process-local memory.

pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
