//! Driving port for registration, login, and profile reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Registration payload; the only place a raw password crosses the domain
/// boundary, and it is consumed immediately by the hashing service.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Driving port resolving and creating identities.
///
/// The rental core trusts whatever identity this port resolves; it performs
/// no authentication of its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and return it.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Verify credentials and return the matching account, or `Unauthorized`.
    async fn authenticate(&self, credentials: Credentials) -> Result<User, Error>;

    /// Fetch an account by id; `NotFound` when absent.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
