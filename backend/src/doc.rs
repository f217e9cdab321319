//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the shared
//! response schemas, and the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    BikeCategory, CategoryBreakdown, DashboardOverview, Error, ErrorCode, PaymentStatus,
    RentalStatus, RevenueSummary,
};
use crate::inbound::http::bikes::{CreateBikeRequestBody, UpdateBikeRequestBody};
use crate::inbound::http::dashboard::DashboardStatsResponseBody;
use crate::inbound::http::schemas::{BikeResponseBody, RentalResponseBody, UserResponseBody};
use crate::inbound::http::users::{LoginRequestBody, RegisterRequestBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bike rental API",
        description = "HTTP interface for the bike catalogue, rental lifecycle, \
                       accounts, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::me,
        crate::inbound::http::bikes::list_bikes,
        crate::inbound::http::bikes::get_bike,
        crate::inbound::http::bikes::create_bike,
        crate::inbound::http::bikes::update_bike,
        crate::inbound::http::bikes::delete_bike,
        crate::inbound::http::rentals::rent_bike,
        crate::inbound::http::rentals::return_bike,
        crate::inbound::http::rentals::cancel_rental,
        crate::inbound::http::rentals::my_rentals,
        crate::inbound::http::rentals::list_rentals,
        crate::inbound::http::dashboard::dashboard_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        BikeCategory,
        RentalStatus,
        PaymentStatus,
        BikeResponseBody,
        RentalResponseBody,
        UserResponseBody,
        CreateBikeRequestBody,
        UpdateBikeRequestBody,
        RegisterRequestBody,
        LoginRequestBody,
        DashboardStatsResponseBody,
        DashboardOverview,
        RevenueSummary,
        CategoryBreakdown,
    )),
    tags(
        (name = "auth", description = "Account registration and sessions"),
        (name = "bikes", description = "Catalogue reads and admin management"),
        (name = "rentals", description = "Rental lifecycle operations"),
        (name = "dashboard", description = "Admin reporting"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn rental_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let rental = schemas.get("RentalResponseBody").expect("rental schema");

        assert_object_schema_has_field(rental, "totalCostCents");
        assert_object_schema_has_field(rental, "paymentStatus");
    }

    #[test]
    fn lifecycle_paths_are_registered() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/rentals/bikes/{bike_id}/rent"));
        assert!(paths.contains_key("/api/v1/rentals/{rental_id}/return"));
        assert!(paths.contains_key("/api/v1/bikes/{bike_id}"));
        assert!(paths.contains_key("/api/v1/dashboard/stats"));
        assert!(paths.contains_key("/health/ready"));
    }
}
