//! Bike catalogue HTTP handlers.
//!
//! ```text
//! GET    /api/v1/bikes
//! POST   /api/v1/bikes
//! GET    /api/v1/bikes/{bike_id}
//! PUT    /api/v1/bikes/{bike_id}
//! DELETE /api/v1/bikes/{bike_id}
//! ```
//!
//! Reads are public; mutations require the admin capability.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::BikeChanges;
use crate::domain::ports::BikeFilter;
use crate::domain::{BikeCategory, BikeDraft, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::BikeResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Listing filter accepted as query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BikeListQuery {
    /// Restrict to one category.
    pub category: Option<String>,
    /// When true, only bikes currently available for rent.
    pub available: Option<bool>,
}

/// Request payload for listing a new bike.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBikeRequestBody {
    pub name: String,
    #[schema(example = "naked")]
    pub category: String,
    #[schema(example = 1500)]
    pub price_per_hour_cents: i64,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

/// Request payload for editing a bike. Absent fields are left unchanged;
/// availability is not editable here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBikeRequestBody {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_per_hour_cents: Option<i64>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub location: Option<String>,
    pub image: Option<String>,
}

fn parse_category(value: &str) -> Result<BikeCategory, Error> {
    BikeCategory::from_str(value).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "category",
            "value": value,
        }))
    })
}

fn filter_from_query(query: BikeListQuery) -> Result<BikeFilter, Error> {
    Ok(BikeFilter {
        category: query.category.as_deref().map(parse_category).transpose()?,
        only_available: query.available.unwrap_or(false),
    })
}

/// List the catalogue, newest listing first.
#[utoipa::path(
    get,
    path = "/api/v1/bikes",
    params(BikeListQuery),
    responses(
        (status = 200, description = "Catalogue listing", body = Vec<BikeResponseBody>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "listBikes"
)]
#[get("/bikes")]
pub async fn list_bikes(
    state: web::Data<HttpState>,
    query: web::Query<BikeListQuery>,
) -> ApiResult<web::Json<Vec<BikeResponseBody>>> {
    let filter = filter_from_query(query.into_inner())?;
    let bikes = state.bike_query.list_bikes(filter).await?;
    Ok(web::Json(
        bikes.into_iter().map(BikeResponseBody::from).collect(),
    ))
}

/// Fetch one bike.
#[utoipa::path(
    get,
    path = "/api/v1/bikes/{bike_id}",
    params(("bike_id" = uuid::Uuid, Path, description = "Bike identifier")),
    responses(
        (status = 200, description = "The bike", body = BikeResponseBody),
        (status = 404, description = "Unknown bike", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "getBike"
)]
#[get("/bikes/{bike_id}")]
pub async fn get_bike(
    state: web::Data<HttpState>,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<BikeResponseBody>> {
    let bike = state.bike_query.get_bike(&path.into_inner()).await?;
    Ok(web::Json(bike.into()))
}

/// List a new bike (admin).
#[utoipa::path(
    post,
    path = "/api/v1/bikes",
    request_body = CreateBikeRequestBody,
    responses(
        (status = 201, description = "Bike listed", body = BikeResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "createBike",
    security(("SessionCookie" = []))
)]
#[post("/bikes")]
pub async fn create_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBikeRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let mut draft = BikeDraft::listed(
        payload.name,
        parse_category(&payload.category)?,
        payload.price_per_hour_cents,
        payload.description,
    );
    draft.features = payload.features;
    if let Some(location) = payload.location {
        draft.location = location;
    }
    if let Some(image) = payload.image {
        draft.image = image;
    }
    let bike = state.bike_command.create_bike(draft).await?;
    Ok(HttpResponse::Created().json(BikeResponseBody::from(bike)))
}

/// Edit a bike's attributes (admin).
#[utoipa::path(
    put,
    path = "/api/v1/bikes/{bike_id}",
    params(("bike_id" = uuid::Uuid, Path, description = "Bike identifier")),
    request_body = UpdateBikeRequestBody,
    responses(
        (status = 200, description = "Updated bike", body = BikeResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown bike", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "updateBike",
    security(("SessionCookie" = []))
)]
#[put("/bikes/{bike_id}")]
pub async fn update_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<uuid::Uuid>,
    payload: web::Json<UpdateBikeRequestBody>,
) -> ApiResult<web::Json<BikeResponseBody>> {
    session.require_admin()?;
    let payload = payload.into_inner();
    let changes = BikeChanges {
        name: payload.name,
        category: payload.category.as_deref().map(parse_category).transpose()?,
        price_per_hour_cents: payload.price_per_hour_cents,
        description: payload.description,
        features: payload.features,
        location: payload.location,
        image: payload.image,
    };
    let bike = state
        .bike_command
        .update_bike(&path.into_inner(), changes)
        .await?;
    Ok(web::Json(bike.into()))
}

/// Delete a bike (admin). Rejected while a rental holds it.
#[utoipa::path(
    delete,
    path = "/api/v1/bikes/{bike_id}",
    params(("bike_id" = uuid::Uuid, Path, description = "Bike identifier")),
    responses(
        (status = 204, description = "Bike deleted"),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown bike", body = Error),
        (status = 409, description = "Bike has an active rental", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bikes"],
    operation_id = "deleteBike",
    security(("SessionCookie" = []))
)]
#[delete("/bikes/{bike_id}")]
pub async fn delete_bike(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.bike_command.delete_bike(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "bikes_tests.rs"]
mod tests;
