//! Account use cases: signup, login and user lookups.
//!
//! Every store call is bounded by the configured timeout so a stalled
//! database fails the request instead of hanging it.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::Deserialize;
use time::OffsetDateTime;
use tokio::task::spawn_blocking;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::CredentialHasher;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::repos::users::{User, UserFilter, UserStore};
use crate::state::security_config::SecurityConfig;
use crate::validation::{
    email_format, length_between, min_length, required, Validate, ValidationErrors,
};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

const USER_NOT_FOUND: &str = "No user found with given ID";

/// Body of `POST /users/signup`. Missing fields decode as empty and fail validation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "name", &self.name);
        if required(&mut errors, "username", &self.username) {
            length_between(&mut errors, "username", &self.username, 3, 20);
        }
        required(&mut errors, "phone", &self.phone);
        if required(&mut errors, "email", &self.email) {
            email_format(&mut errors, "email", &self.email);
        }
        if required(&mut errors, "password", &self.password) {
            min_length(&mut errors, "password", &self.password, 8);
        }
        errors.into_result()
    }
}

/// Body of `POST /users/login`.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if required(&mut errors, "username", &self.username) {
            length_between(&mut errors, "username", &self.username, 3, 20);
        }
        required(&mut errors, "password", &self.password);
        errors.into_result()
    }
}

// passwords stay out of Debug output
impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &Redacted(&self.email))
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// A successful login: the account and a freshly minted access token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    security: SecurityConfig,
    store_timeout: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, security: SecurityConfig) -> Self {
        Self {
            store,
            hasher: CredentialHasher::default(),
            security,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    op,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(DomainError::infra(
                    InfraErrorKind::Timeout,
                    format!("{op} timed out"),
                ))
            }
        }
    }

    /// Argon2 runs on the blocking pool so request workers keep serving.
    async fn off_worker<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(CredentialHasher) -> T + Send + 'static,
        T: Send + 'static,
    {
        let hasher = self.hasher.clone();
        spawn_blocking(move || work(hasher)).await.map_err(|e| {
            DomainError::infra(InfraErrorKind::Crypto, format!("hashing task failed: {e}"))
        })
    }

    /// Creates an account holding the password hash. Name, username and email
    /// are stored exactly as submitted. Nothing is written when validation fails.
    pub async fn register(&self, req: SignupRequest) -> Result<User, AppError> {
        req.validate().map_err(DomainError::from)?;
        let SignupRequest {
            name,
            username,
            email,
            password,
            ..
        } = req;

        let password_hash = self
            .off_worker(move |hasher| hasher.hash(&password))
            .await??;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        self.bounded("insert_user", self.store.insert_one(&user))
            .await?;

        info!(user_id = %user.id, email = %Redacted(&user.email), "user registered");
        Ok(user)
    }

    /// Checks credentials and issues an access token.
    ///
    /// Unknown username and wrong password produce the same error.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, AppError> {
        req.validate().map_err(DomainError::from)?;
        let LoginRequest { username, password } = req;

        let found = self
            .bounded(
                "find_user_by_username",
                self.store.find_one(UserFilter::Username(username)),
            )
            .await?;

        // an unknown username still pays for one verification
        let stored = found.as_ref().map(|user| user.password_hash.clone());
        let matched = self
            .off_worker(move |hasher| match stored {
                Some(stored) => hasher.verify(&password, &stored),
                None => hasher.verify_decoy(&password),
            })
            .await?;

        let user = match found {
            Some(user) if matched => user,
            Some(user) => {
                debug!(user_id = %user.id, "login rejected: password mismatch");
                return Err(DomainError::InvalidCredentials.into());
            }
            None => {
                debug!("login rejected: unknown username");
                return Err(DomainError::InvalidCredentials.into());
            }
        };

        let token = mint_access_token(&user.email, SystemTime::now(), &self.security)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome { user, token })
    }

    /// A blank id matches nothing and reports not found.
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::not_found(NotFoundKind::User, USER_NOT_FOUND).into());
        }

        let found = self
            .bounded(
                "find_user_by_id",
                self.store.find_one(UserFilter::Id(id.to_string())),
            )
            .await?;
        found.ok_or_else(|| DomainError::not_found(NotFoundKind::User, USER_NOT_FOUND).into())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self
            .bounded("list_users", self.store.find_many(UserFilter::All))
            .await?)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.bounded("ping", self.store.ping()).await?)
    }
}
