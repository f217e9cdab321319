//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting the authenticated identity,
//! requiring it, and requiring the admin capability.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Role, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id().to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, user.role().to_string()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the session, logging the user out.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::from_str(&raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn role(&self) -> Result<Option<Role>, Error> {
        let role = self
            .0
            .get::<String>(ROLE_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match role {
            Some(raw) => match Role::from_str(&raw) {
                Ok(role) => Ok(Some(role)),
                Err(error) => {
                    tracing::warn!("invalid role in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated admin or return 401/403.
    pub fn require_admin(&self) -> Result<UserId, Error> {
        let user_id = self.require_user_id()?;
        match self.role()? {
            Some(Role::Admin) => Ok(user_id),
            _ => Err(Error::forbidden("admin capability required")),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
