//! Registration, login, and profile reads.
//!
//! Passwords are stored as salted SHA-256 digests encoded `salt$digest` in
//! hex. The raw password exists only inside [`AuthService::register`] and
//! [`AuthService::authenticate`]; nothing else in the crate sees it.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::ports::{
    AccountService, Credentials, Registration, UserRecord, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, Role, User, UserDraft, UserId};

/// Shortest password accepted at registration.
const MIN_PASSWORD_CHARS: usize = 6;

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
        }
    }
}

fn digest_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn encode_digest(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    format!("{}${}", hex::encode(salt), digest_password(&salt, password))
}

fn verify_digest(stored: &str, password: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_password(&salt, password) == digest
}

/// Identity service over the account store.
pub struct AuthService<U> {
    users: Arc<U>,
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    /// Create an identity service over the given store.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> AccountService for AuthService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if registration.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(Error::invalid_request(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters long"
            )));
        }
        // Self-service registration always creates a regular customer;
        // admin accounts are provisioned out of band.
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            role: Role::User,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let record = UserRecord {
            user: user.clone(),
            password_digest: encode_digest(&registration.password),
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user)
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<User, Error> {
        let email = credentials.email.trim().to_lowercase();
        let record = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?;
        // One rejection message for both unknown email and wrong password.
        match record {
            Some(record) if verify_digest(&record.password_digest, &credentials.password) => {
                Ok(record.user)
            }
            _ => Err(Error::unauthorized("invalid email or password")),
        }
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Identity flows against the in-memory account store.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::outbound::memory::InMemoryUserRepository;

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Maria Rossi".to_owned(),
            email: email.to_owned(),
            phone: "+44 7700 900123".to_owned(),
            password: "hunter22".to_owned(),
        }
    }

    fn service() -> AuthService<InMemoryUserRepository> {
        AuthService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn register_then_authenticate_round_trips() {
        let service = service();
        let registered = service
            .register(registration("Maria@Example.com"))
            .await
            .expect("registration succeeds");
        assert_eq!(registered.email(), "maria@example.com");
        assert_eq!(registered.role(), Role::User);

        let authed = service
            .authenticate(Credentials {
                email: "MARIA@example.com".to_owned(),
                password: "hunter22".to_owned(),
            })
            .await
            .expect("login succeeds");
        assert_eq!(authed.id(), registered.id());

        let profile = service
            .profile(registered.id())
            .await
            .expect("profile succeeds");
        assert_eq!(profile, registered);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_read_the_same() {
        let service = service();
        service
            .register(registration("maria@example.com"))
            .await
            .expect("registration succeeds");

        let wrong_password = service
            .authenticate(Credentials {
                email: "maria@example.com".to_owned(),
                password: "not-hunter22".to_owned(),
            })
            .await
            .expect_err("login rejected");
        let unknown_email = service
            .authenticate(Credentials {
                email: "nobody@example.com".to_owned(),
                password: "hunter22".to_owned(),
            })
            .await
            .expect_err("login rejected");

        assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown_email.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message(), unknown_email.message());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let service = service();
        service
            .register(registration("maria@example.com"))
            .await
            .expect("registration succeeds");
        let err = service
            .register(registration("Maria@example.com"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let err = service()
            .register(Registration {
                password: "12345".to_owned(),
                ..registration("maria@example.com")
            })
            .await
            .expect_err("short password rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn digests_verify_and_differ_per_salt() {
        let first = encode_digest("hunter22");
        let second = encode_digest("hunter22");
        assert_ne!(first, second);
        assert!(verify_digest(&first, "hunter22"));
        assert!(verify_digest(&second, "hunter22"));
        assert!(!verify_digest(&first, "hunter23"));
        assert!(!verify_digest("malformed-no-separator", "hunter22"));
    }
}
