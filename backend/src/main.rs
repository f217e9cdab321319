//! Backend entry-point: wires the HTTP surface onto PostgreSQL-backed or
//! in-memory stores.
//!
//! With `DATABASE_URL` set, migrations run at startup and the Diesel
//! adapters back the ports; without it the process serves from memory,
//! which suits demos and local development.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::domain::ports::{
    AlwaysApprovePaymentGateway, BikeRepository, RentalRepository, UserRepository,
};
use backend::domain::{AuthService, BikeCatalogueService, DashboardService, RentalService};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{bikes, dashboard, rentals, users};
use backend::middleware::Trace;
use backend::outbound::memory::{
    InMemoryBikeRepository, InMemoryRentalRepository, InMemoryUserRepository,
};
use backend::outbound::persistence::{
    DbPool, DieselBikeRepository, DieselRentalRepository, DieselUserRepository, PoolConfig,
    apply_migrations,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let state = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            apply_migrations(&database_url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(std::io::Error::other)?;
            let bikes = Arc::new(DieselBikeRepository::new(pool.clone()));
            let rentals = Arc::new(DieselRentalRepository::new(pool.clone()));
            let users = Arc::new(DieselUserRepository::new(pool));
            seed_startup_data(users.as_ref(), bikes.as_ref()).await;
            info!("serving from PostgreSQL-backed stores");
            build_state(bikes, rentals, users)
        }
        Err(_) => {
            warn!("DATABASE_URL not set; serving from in-memory stores");
            let bikes = Arc::new(InMemoryBikeRepository::new());
            let rentals = Arc::new(InMemoryRentalRepository::new());
            let users = Arc::new(InMemoryUserRepository::new());
            seed_startup_data(users.as_ref(), bikes.as_ref()).await;
            build_state(bikes, rentals, users)
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::me)
            .service(bikes::list_bikes)
            .service(bikes::get_bike)
            .service(bikes::create_bike)
            .service(bikes::update_bike)
            .service(bikes::delete_bike)
            .service(rentals::rent_bike)
            .service(rentals::return_bike)
            .service(rentals::cancel_rental)
            .service(rentals::my_rentals)
            .service(rentals::list_rentals)
            .service(dashboard::dashboard_stats);

        let mut app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(("0.0.0.0", 8080))?;

    health_state.mark_ready();
    server.run().await
}

/// Load the session signing key, falling back to an ephemeral one only in
/// development builds or when explicitly allowed.
fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Wire the domain services over one family of stores.
fn build_state<B, R, U>(bikes: Arc<B>, rentals: Arc<R>, users: Arc<U>) -> HttpState
where
    B: BikeRepository + 'static,
    R: RentalRepository + 'static,
    U: UserRepository + 'static,
{
    let rental_service = Arc::new(RentalService::new(
        Arc::clone(&bikes),
        Arc::clone(&rentals),
        Arc::new(AlwaysApprovePaymentGateway),
        Arc::new(DefaultClock),
    ));
    let catalogue = Arc::new(BikeCatalogueService::new(
        Arc::clone(&bikes),
        Arc::clone(&rentals),
    ));

    HttpState {
        accounts: Arc::new(AuthService::new(Arc::clone(&users))),
        bike_query: catalogue.clone(),
        bike_command: catalogue,
        rental_command: rental_service.clone(),
        rental_query: rental_service,
        dashboard: Arc::new(DashboardService::new(bikes, rentals, users)),
    }
}

#[cfg(feature = "example-data")]
async fn seed_startup_data(users: &dyn UserRepository, bikes: &dyn BikeRepository) {
    if let Err(err) = backend::example_data::seed_example_data(users, bikes).await {
        warn!(error = %err, "example data seeding failed");
    }
}

#[cfg(not(feature = "example-data"))]
async fn seed_startup_data(_users: &dyn UserRepository, _bikes: &dyn BikeRepository) {}
