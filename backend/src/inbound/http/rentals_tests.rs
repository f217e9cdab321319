//! Handler tests for the rental lifecycle routes. Users come in through the
//! real registration endpoint; billing-sensitive cases seed back-dated
//! rentals directly in the in-memory store.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{BikeRepository, RentalRepository};
use crate::domain::{Bike, BikeCategory, BikeDraft, Rental, Role, User, UserDraft};
use crate::inbound::http::test_utils::{
    InMemoryHarness, in_memory_harness, session_cookie, test_session_middleware,
};
use crate::inbound::http::users::register;

fn fixture_admin() -> User {
    User::new(UserDraft {
        id: UserId::random(),
        name: "Ana Admin".to_owned(),
        email: "ana@example.com".to_owned(),
        phone: String::new(),
        role: Role::Admin,
    })
    .expect("valid fixture")
}

fn fixture_bike(name: &str, available: bool) -> Bike {
    let mut draft = BikeDraft::listed(
        name.to_owned(),
        BikeCategory::Naked,
        1500,
        "A quick city ride.".to_owned(),
    );
    draft.available = available;
    Bike::new(draft).expect("valid fixture")
}

fn rental_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(rent_bike)
                .service(return_bike)
                .service(cancel_rental)
                .service(my_rentals)
                .service(list_rentals),
        )
        .route(
            "/test/login-admin",
            web::get().to(|session: SessionContext| async move {
                session.persist_user(&fixture_admin())?;
                Ok::<_, Error>(actix_web::HttpResponse::Ok())
            }),
        )
}

async fn register_rider(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> (UserId, actix_web::cookie::Cookie<'static>) {
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": "Maria Rossi",
                "email": email,
                "password": "hunter42",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response);
    let body: Value = test::read_body_json(response).await;
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .expect("id in payload");
    (UserId::from_str(id).expect("valid user id"), cookie)
}

async fn seed_bike(harness: &InMemoryHarness, bike: &Bike) {
    harness.bikes.insert(bike).await.expect("bike seeded");
}

async fn seed_rental(harness: &InMemoryHarness, rental: &Rental) {
    harness.rentals.insert(rental).await.expect("rental seeded");
}

#[actix_web::test]
async fn renting_requires_a_session() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", true);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rentals/bikes/{}/rent", bike.id()))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn renting_claims_the_bike_and_is_exclusive_per_user() {
    let harness = in_memory_harness();
    let first = fixture_bike("Street Triple", true);
    let second = fixture_bike("Tiger 900", true);
    seed_bike(&harness, &first).await;
    seed_bike(&harness, &second).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (user_id, cookie) = register_rider(&app, "maria@example.com").await;

    let opened = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rentals/bikes/{}/rent", first.id()))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(opened.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(opened).await;
    assert_eq!(body.get("status").and_then(Value::as_str), Some("active"));
    assert_eq!(
        body.get("userId").and_then(Value::as_str),
        Some(user_id.to_string().as_str())
    );

    let claimed = harness
        .bikes
        .find_by_id(&first.id())
        .await
        .expect("lookup succeeds")
        .expect("bike present");
    assert!(!claimed.is_available());

    let refused = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rentals/bikes/{}/rent", second.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(refused).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));
}

#[actix_web::test]
async fn renting_an_unavailable_bike_conflicts() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (_, cookie) = register_rider(&app, "maria@example.com").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rentals/bikes/{}/rent", bike.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("unavailable")
    );
}

#[actix_web::test]
async fn returning_bills_rounded_up_hours_and_frees_the_bike() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (user_id, cookie) = register_rider(&app, "maria@example.com").await;
    let rental = Rental::open(user_id, bike.id(), Utc::now() - Duration::minutes(90));
    seed_rental(&harness, &rental).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/rentals/{}/return", rental.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("status").and_then(Value::as_str),
        Some("completed")
    );
    assert_eq!(
        body.get("paymentStatus").and_then(Value::as_str),
        Some("paid")
    );
    // 90 minutes at 1500 cents/hour bills two started hours.
    assert_eq!(
        body.get("totalCostCents").and_then(Value::as_i64),
        Some(3000)
    );

    let freed = harness
        .bikes
        .find_by_id(&bike.id())
        .await
        .expect("lookup succeeds")
        .expect("bike present");
    assert!(freed.is_available());
}

#[actix_web::test]
async fn cancelling_frees_the_bike_without_billing() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (user_id, cookie) = register_rider(&app, "maria@example.com").await;
    let rental = Rental::open(user_id, bike.id(), Utc::now() - Duration::minutes(15));
    seed_rental(&harness, &rental).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/rentals/{}/cancel", rental.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("status").and_then(Value::as_str),
        Some("cancelled")
    );
    assert!(body.get("totalCostCents").expect("field present").is_null());

    let freed = harness
        .bikes
        .find_by_id(&bike.id())
        .await
        .expect("lookup succeeds")
        .expect("bike present");
    assert!(freed.is_available());
}

#[actix_web::test]
async fn returning_another_riders_rental_is_not_found() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (_, cookie) = register_rider(&app, "maria@example.com").await;
    let foreign = Rental::open(UserId::random(), bike.id(), Utc::now());
    seed_rental(&harness, &foreign).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/rentals/{}/return", foreign.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn my_rentals_lists_only_the_callers_history() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (user_id, cookie) = register_rider(&app, "maria@example.com").await;
    let own = Rental::open(user_id, bike.id(), Utc::now());
    let mut cancelled = Rental::open(user_id, bike.id(), Utc::now() - Duration::hours(3));
    cancelled
        .cancel(Utc::now() - Duration::hours(2))
        .expect("cancellable");
    let foreign = Rental::open(UserId::random(), bike.id(), Utc::now());
    seed_rental(&harness, &own).await;
    seed_rental(&harness, &cancelled).await;
    seed_rental(&harness, &foreign).await;

    let all = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rentals/my-rentals")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(all.status(), StatusCode::OK);
    let all: Vec<Value> = test::read_body_json(all).await;
    assert_eq!(all.len(), 2);
    assert!(
        all.iter().all(|rental| {
            rental.get("userId").and_then(Value::as_str) == Some(user_id.to_string().as_str())
        })
    );

    let active = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rentals/my-rentals?status=active")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let active: Vec<Value> = test::read_body_json(active).await;
    assert_eq!(active.len(), 1);
    assert_eq!(
        active[0].get("id").and_then(Value::as_str),
        Some(own.id().to_string().as_str())
    );
}

#[actix_web::test]
async fn the_unfiltered_listing_is_admin_only() {
    let harness = in_memory_harness();
    let bike = fixture_bike("Street Triple", false);
    seed_bike(&harness, &bike).await;
    let app = test::init_service(rental_app(harness.state.clone())).await;
    let (user_id, cookie) = register_rider(&app, "maria@example.com").await;
    seed_rental(&harness, &Rental::open(user_id, bike.id(), Utc::now())).await;
    seed_rental(
        &harness,
        &Rental::open(UserId::random(), bike.id(), Utc::now()),
    )
    .await;

    let forbidden = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rentals")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin_login = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/test/login-admin")
            .to_request(),
    )
    .await;
    let admin_cookie = session_cookie(&admin_login);

    let listing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rentals")
            .cookie(admin_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::OK);
    let listing: Vec<Value> = test::read_body_json(listing).await;
    assert_eq!(listing.len(), 2);

    let filtered = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/rentals?userId={user_id}"))
            .cookie(admin_cookie)
            .to_request(),
    )
    .await;
    let filtered: Vec<Value> = test::read_body_json(filtered).await;
    assert_eq!(filtered.len(), 1);
}
