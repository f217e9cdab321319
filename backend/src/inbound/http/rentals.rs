//! Rental lifecycle HTTP handlers.
//!
//! ```text
//! POST /api/v1/rentals/bikes/{bike_id}/rent
//! PUT  /api/v1/rentals/{rental_id}/return
//! PUT  /api/v1/rentals/{rental_id}/cancel
//! GET  /api/v1/rentals/my-rentals
//! GET  /api/v1/rentals
//! ```
//!
//! All routes require a session; the unfiltered listing is admin-only.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::ports::RentalFilter;
use crate::domain::{Error, RentalStatus, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::RentalResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Listing filter accepted as query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RentalListQuery {
    /// Restrict to one lifecycle status.
    pub status: Option<String>,
    /// Restrict to one user (admin listing only).
    pub user_id: Option<uuid::Uuid>,
}

fn parse_status(value: &str) -> Result<RentalStatus, Error> {
    RentalStatus::from_str(value).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "status",
            "value": value,
        }))
    })
}

/// Rent a bike for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/rentals/bikes/{bike_id}/rent",
    params(("bike_id" = uuid::Uuid, Path, description = "Bike identifier")),
    responses(
        (status = 201, description = "Rental opened", body = RentalResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Unknown bike", body = Error),
        (status = 409, description = "Bike unavailable or user already renting", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rentals"],
    operation_id = "rentBike",
    security(("SessionCookie" = []))
)]
#[post("/rentals/bikes/{bike_id}/rent")]
pub async fn rent_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let rental = state
        .rental_command
        .rent_bike(&user_id, &path.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(RentalResponseBody::from(rental)))
}

/// Return the authenticated user's active rental, billing it.
#[utoipa::path(
    put,
    path = "/api/v1/rentals/{rental_id}/return",
    params(("rental_id" = uuid::Uuid, Path, description = "Rental identifier")),
    responses(
        (status = 200, description = "Rental completed and billed", body = RentalResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "No matching active rental", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rentals"],
    operation_id = "returnBike",
    security(("SessionCookie" = []))
)]
#[put("/rentals/{rental_id}/return")]
pub async fn return_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<RentalResponseBody>> {
    let user_id = session.require_user_id()?;
    let rental = state
        .rental_command
        .return_bike(&user_id, &path.into_inner())
        .await?;
    Ok(web::Json(rental.into()))
}

/// Cancel the authenticated user's active rental without billing.
#[utoipa::path(
    put,
    path = "/api/v1/rentals/{rental_id}/cancel",
    params(("rental_id" = uuid::Uuid, Path, description = "Rental identifier")),
    responses(
        (status = 200, description = "Rental cancelled", body = RentalResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "No matching active rental", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rentals"],
    operation_id = "cancelRental",
    security(("SessionCookie" = []))
)]
#[put("/rentals/{rental_id}/cancel")]
pub async fn cancel_rental(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<RentalResponseBody>> {
    let user_id = session.require_user_id()?;
    let rental = state
        .rental_command
        .cancel_rental(&user_id, &path.into_inner())
        .await?;
    Ok(web::Json(rental.into()))
}

/// List the authenticated user's rentals, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rentals/my-rentals",
    params(RentalListQuery),
    responses(
        (status = 200, description = "The user's rentals", body = Vec<RentalResponseBody>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rentals"],
    operation_id = "myRentals",
    security(("SessionCookie" = []))
)]
#[get("/rentals/my-rentals")]
pub async fn my_rentals(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RentalListQuery>,
) -> ApiResult<web::Json<Vec<RentalResponseBody>>> {
    let user_id = session.require_user_id()?;
    let status = query
        .into_inner()
        .status
        .as_deref()
        .map(parse_status)
        .transpose()?;
    let rentals = state.rental_query.my_rentals(&user_id, status).await?;
    Ok(web::Json(
        rentals.into_iter().map(RentalResponseBody::from).collect(),
    ))
}

/// List rentals across all users (admin), newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rentals",
    params(RentalListQuery),
    responses(
        (status = 200, description = "Matching rentals", body = Vec<RentalResponseBody>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rentals"],
    operation_id = "listRentals",
    security(("SessionCookie" = []))
)]
#[get("/rentals")]
pub async fn list_rentals(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RentalListQuery>,
) -> ApiResult<web::Json<Vec<RentalResponseBody>>> {
    session.require_admin()?;
    let query = query.into_inner();
    let filter = RentalFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        user_id: query.user_id.map(UserId::from_uuid),
    };
    let rentals = state.rental_query.list_rentals(filter).await?;
    Ok(web::Json(
        rentals.into_iter().map(RentalResponseBody::from).collect(),
    ))
}

#[cfg(test)]
#[path = "rentals_tests.rs"]
mod tests;
