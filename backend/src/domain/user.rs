//! User identity and role primitives.
//!
//! The rental core trusts an already-resolved identity; these types carry it.
//! Role-based capability checks happen in the inbound adapter — the domain
//! services are role-agnostic apart from the ownership check on return.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Capability level attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer: browse, rent, return.
    User,
    /// Fleet administrator: inventory management and statistics.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name shorter than two characters once trimmed.
    #[error("name must be at least 2 characters long")]
    NameTooShort,
    /// Email without the minimal user@host shape.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Role string outside the known set.
    #[error("unknown role: {value}")]
    UnknownRole {
        /// The rejected input.
        value: String,
    },
}

/// Input payload for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

/// A registered account as the domain sees it.
///
/// Credentials are a persistence concern and never appear on this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    phone: String,
    role: Role,
}

impl User {
    /// Creates a validated user.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        Self::try_from(draft)
    }

    /// Returns the account id.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the login email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the contact phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the capability level.
    pub fn role(&self) -> Role {
        self.role
    }

    /// True when the account carries the admin capability.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<UserDraft> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDraft) -> Result<Self, Self::Error> {
        let name = value.name.trim().to_owned();
        if name.chars().count() < 2 {
            return Err(UserValidationError::NameTooShort);
        }
        let email = value.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self {
            id: value.id,
            name,
            email,
            phone: value.phone.trim().to_owned(),
            role: value.role,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let host = parts.next().unwrap_or_default();
    !local.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}
