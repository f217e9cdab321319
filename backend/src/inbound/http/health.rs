//! Health endpoints: liveness and readiness probes for orchestration.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

const STARTING: u8 = 0;
const READY: u8 = 1;
const STOPPING: u8 = 2;

/// Coarse process phase driving both probes.
///
/// The process starts in `Starting` (live but not ready), moves to `Ready`
/// once stores and migrations are in place, and to `Stopping` during
/// shutdown so orchestrators stop routing traffic and restart it.
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }
}

impl HealthState {
    /// Create a health state in the starting phase: live, not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready to take traffic.
    pub fn mark_ready(&self) {
        self.phase.store(READY, Ordering::Release);
    }

    /// Enter the stopping phase; both probes fail from here on.
    pub fn begin_shutdown(&self) {
        self.phase.store(STOPPING, Ordering::Release);
    }

    /// True once the service reached readiness and is not shutting down.
    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == READY
    }

    /// True unless the service entered shutdown.
    pub fn is_alive(&self) -> bool {
        self.phase.load(Ordering::Acquire) != STOPPING
    }
}

// Probe responses must never be cached by intermediaries.
fn probe_response(probe_ok: bool) -> HttpResponse {
    let mut response = if probe_ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process is shutting down")
    ),
    tags = ["health"],
    operation_id = "healthLive"
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Still starting up")
    ),
    tags = ["health"],
    operation_id = "healthReady"
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;

    async fn probe(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
    ) -> StatusCode {
        test::call_service(app, test::TestRequest::get().uri(uri).to_request())
            .await
            .status()
    }

    #[actix_web::test]
    async fn probes_track_the_process_phase() {
        let state = web::Data::new(HealthState::new());
        let app =
            test::init_service(App::new().app_data(state.clone()).service(ready).service(live))
                .await;

        assert_eq!(
            probe(&app, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(probe(&app, "/health/live").await, StatusCode::OK);

        state.mark_ready();
        assert_eq!(probe(&app, "/health/ready").await, StatusCode::OK);

        state.begin_shutdown();
        assert_eq!(
            probe(&app, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            probe(&app, "/health/live").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[actix_web::test]
    async fn probes_forbid_caching() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(App::new().app_data(state).service(live)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
                .await;
        assert_eq!(
            res.headers()
                .get(actix_web::http::header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }
}
