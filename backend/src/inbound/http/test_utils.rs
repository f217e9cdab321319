//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::ports::AlwaysApprovePaymentGateway;
use crate::domain::{AuthService, BikeCatalogueService, DashboardService, RentalService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryBikeRepository, InMemoryRentalRepository, InMemoryUserRepository,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a login or register response.
///
/// # Panics
/// Panics when the response carries no `session` cookie.
pub fn session_cookie(
    response: &actix_web::dev::ServiceResponse,
) -> actix_web::cookie::Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// An [`HttpState`] plus direct handles to its in-memory stores, so tests
/// can seed and inspect data around handler calls.
pub struct InMemoryHarness {
    pub state: HttpState,
    pub bikes: Arc<InMemoryBikeRepository>,
    pub rentals: Arc<InMemoryRentalRepository>,
    pub users: Arc<InMemoryUserRepository>,
}

/// Build a harness wired to fresh in-memory repositories.
pub fn in_memory_harness() -> InMemoryHarness {
    let bikes = Arc::new(InMemoryBikeRepository::new());
    let rentals = Arc::new(InMemoryRentalRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());

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

    let state = HttpState {
        accounts: Arc::new(AuthService::new(Arc::clone(&users))),
        bike_query: catalogue.clone(),
        bike_command: catalogue,
        rental_command: rental_service.clone(),
        rental_query: rental_service,
        dashboard: Arc::new(DashboardService::new(
            Arc::clone(&bikes),
            Arc::clone(&rentals),
            Arc::clone(&users),
        )),
    };
    InMemoryHarness {
        state,
        bikes,
        rentals,
        users,
    }
}
