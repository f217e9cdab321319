//! Admin dashboard HTTP handler.
//!
//! ```text
//! GET /api/v1/dashboard/stats
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CategoryBreakdown, DashboardOverview, Error, RevenueSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::RentalResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard snapshot as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponseBody {
    pub overview: DashboardOverview,
    pub revenue: RevenueSummary,
    pub bikes_by_category: Vec<CategoryBreakdown>,
    pub recent_rentals: Vec<RentalResponseBody>,
}

/// Compute the current dashboard snapshot (admin).
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardStatsResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardStats",
    security(("SessionCookie" = []))
)]
#[get("/dashboard/stats")]
pub async fn dashboard_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStatsResponseBody>> {
    session.require_admin()?;
    let stats = state.dashboard.stats().await?;
    Ok(web::Json(DashboardStatsResponseBody {
        overview: stats.overview,
        revenue: stats.revenue,
        bikes_by_category: stats.bikes_by_category,
        recent_rentals: stats
            .recent_rentals
            .into_iter()
            .map(RentalResponseBody::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::Utc;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{BikeRepository, RentalRepository};
    use crate::domain::{Bike, BikeCategory, BikeDraft, Rental, Role, User, UserDraft, UserId};
    use crate::inbound::http::test_utils::{
        in_memory_harness, session_cookie, test_session_middleware,
    };

    fn fixture_user(role: Role) -> User {
        User::new(UserDraft {
            id: UserId::random(),
            name: "Ana Admin".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: String::new(),
            role,
        })
        .expect("valid fixture")
    }

    async fn stats_via_session(role: Role) -> (StatusCode, Option<Value>) {
        let harness = in_memory_harness();
        let bike = Bike::new(BikeDraft::listed(
            "Street Triple".to_owned(),
            BikeCategory::Naked,
            1500,
            "A quick city ride.".to_owned(),
        ))
        .expect("valid fixture");
        harness.bikes.insert(&bike).await.expect("bike seeded");
        let mut rental = Rental::open(UserId::random(), bike.id(), Utc::now());
        rental
            .close(Utc::now(), bike.price_per_hour_cents())
            .expect("closable");
        harness
            .rentals
            .insert(&rental)
            .await
            .expect("rental seeded");

        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(dashboard_stats))
                .route(
                    "/test/login",
                    web::get().to(move |session: SessionContext| async move {
                        session.persist_user(&fixture_user(role))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/test/login").to_request())
                .await;
        let cookie = session_cookie(&login);
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/dashboard/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let status = response.status();
        let body = if status == StatusCode::OK {
            Some(test::read_body_json(response).await)
        } else {
            None
        };
        (status, body)
    }

    #[actix_web::test]
    async fn stats_are_admin_only() {
        let (status, _) = stats_via_session(Role::User).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn stats_aggregate_the_stores() {
        let (status, body) = stats_via_session(Role::Admin).await;
        assert_eq!(status, StatusCode::OK);
        let body = body.expect("payload");
        assert_eq!(
            body.pointer("/overview/totalBikes").and_then(Value::as_u64),
            Some(1)
        );
        assert_eq!(
            body.pointer("/overview/completedRentals")
                .and_then(Value::as_u64),
            Some(1)
        );
        assert_eq!(
            body.pointer("/revenue/totalCents").and_then(Value::as_i64),
            Some(1500)
        );
        assert_eq!(
            body.pointer("/bikesByCategory/1/category")
                .and_then(Value::as_str),
            Some("naked")
        );
        assert_eq!(
            body.pointer("/bikesByCategory/1/count").and_then(Value::as_u64),
            Some(1)
        );
        assert_eq!(
            body.get("recentRentals")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }
}
