//! User records and the store abstraction the account service runs against.

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::domain::DomainError;

/// A stored account, including its password hash.
///
/// Deliberately not `Serialize`: responses go through [`PublicUser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// Outward view of a user. Has no password field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Which users a lookup selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(String),
    Username(String),
    Email(String),
    All,
}

/// Persistence seam for user records.
///
/// Unique-field collisions surface as `DomainError::Conflict`, unreachable
/// storage as `DomainError::Infra`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, DomainError>;

    async fn insert_one(&self, user: &User) -> Result<(), DomainError>;

    /// Matching users, oldest first.
    async fn find_many(&self, filter: UserFilter) -> Result<Vec<User>, DomainError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), DomainError>;
}
