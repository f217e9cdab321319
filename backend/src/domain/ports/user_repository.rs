//! Port for account persistence.
//!
//! Credential digests live behind this port and never reach the domain
//! entities; [`UserRecord`] pairs them with the account only at the
//! persistence seam.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// Another account already uses this email address.
        DuplicateEmail { email: String } =>
            "an account already exists for {email}",
    }
}

/// An account plus its stored credential digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The account as the domain sees it.
    pub user: User,
    /// Salted hash of the password, encoded as `salt$digest` hex.
    pub password_digest: String,
}

/// Port for account reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with `DuplicateEmail` when the address
    /// is taken.
    async fn insert(&self, record: &UserRecord) -> Result<(), UserRepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Find an account (with its digest) by normalised email.
    async fn find_by_email(&self, email: &str)
        -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Number of registered accounts. Dashboard overview input.
    async fn count(&self) -> Result<u64, UserRepositoryError>;
}
