//! Identity HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{Credentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::UserResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

use crate::domain::Error;

/// Request payload for account creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    pub name: String,
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    pub email: String,
    pub password: String,
}

/// Create an account and open a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = UserResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let user = state
        .accounts
        .register(Registration {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        })
        .await?;
    session.persist_user(&user)?;
    Ok(HttpResponse::Created().json(UserResponseBody::from(user)))
}

/// Verify credentials and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Logged in", body = UserResponseBody),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let payload = payload.into_inner();
    let user = state
        .accounts
        .authenticate(Credentials {
            email: payload.email,
            password: payload.password,
        })
        .await?;
    session.persist_user(&user)?;
    Ok(web::Json(user.into()))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session dropped")),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The current account", body = UserResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me",
    security(("SessionCookie" = []))
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponseBody>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.profile(&user_id).await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
