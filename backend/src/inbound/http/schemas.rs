//! Shared response payloads for domain entities.
//!
//! Domain entities stay framework-agnostic; these wrappers render them as
//! JSON and OpenAPI schemas. Monetary amounts are integer minor units on the
//! wire, as in the domain.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Bike, BikeCategory, PaymentStatus, Rental, RentalStatus, User};

/// A catalogue bike as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeResponseBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: uuid::Uuid,
    pub name: String,
    pub category: BikeCategory,
    #[schema(example = 1500)]
    pub price_per_hour_cents: i64,
    pub available: bool,
    pub description: String,
    pub features: Vec<String>,
    pub location: String,
    pub image: String,
}

impl From<Bike> for BikeResponseBody {
    fn from(bike: Bike) -> Self {
        Self {
            id: bike.id(),
            name: bike.name().to_owned(),
            category: bike.category(),
            price_per_hour_cents: bike.price_per_hour_cents(),
            available: bike.is_available(),
            description: bike.description().to_owned(),
            features: bike.features().to_vec(),
            location: bike.location().to_owned(),
            image: bike.image().to_owned(),
        }
    }
}

/// A rental record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponseBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: uuid::Uuid,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: uuid::Uuid,
    #[schema(value_type = String, format = "uuid")]
    pub bike_id: uuid::Uuid,
    #[schema(format = "date-time")]
    pub started_at: String,
    #[schema(format = "date-time")]
    pub ended_at: Option<String>,
    pub total_cost_cents: Option<i64>,
    pub status: RentalStatus,
    pub payment_status: PaymentStatus,
}

impl From<Rental> for RentalResponseBody {
    fn from(rental: Rental) -> Self {
        Self {
            id: rental.id(),
            user_id: *rental.user_id().as_uuid(),
            bike_id: rental.bike_id(),
            started_at: rental.started_at().to_rfc3339(),
            ended_at: rental.ended_at().map(|at| at.to_rfc3339()),
            total_cost_cents: rental.total_cost_cents(),
            status: rental.status(),
            payment_status: rental.payment_status(),
        }
    }
}

/// An account as returned by the API. Credentials never appear here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[schema(example = "user")]
    pub role: String,
}

impl From<User> for UserResponseBody {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            phone: user.phone().to_owned(),
            role: user.role().to_string(),
        }
    }
}
