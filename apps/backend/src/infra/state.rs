use std::sync::Arc;
use std::time::Duration;

use crate::adapters::users_sea::SeaUserStore;
use crate::auth::password::CredentialHasher;
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::repos::users::UserStore;
use crate::services::accounts::{AccountService, DEFAULT_STORE_TIMEOUT};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

enum StoreSource {
    Url { url: String, migrate: bool },
    Custom(Arc<dyn UserStore>),
}

/// Builder for [`AppState`], shared by `main` and the test harness.
pub struct StateBuilder {
    /// No default; a signing key must be supplied explicitly
    security_config: Option<SecurityConfig>,
    store: Option<StoreSource>,
    store_timeout: Duration,
    hasher: CredentialHasher,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            store: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            hasher: CredentialHasher::default(),
        }
    }

    pub fn with_database_url(mut self, url: impl Into<String>, migrate: bool) -> Self {
        self.store = Some(StoreSource::Url {
            url: url.into(),
            migrate,
        });
        self
    }

    /// Use an already-built store instead of connecting.
    pub fn with_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.store = Some(StoreSource::Custom(store));
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let Some(security_config) = self.security_config else {
            return Err(AppError::config("no token signing key configured"));
        };
        if !security_config.has_secret() {
            return Err(AppError::config("token signing key is empty"));
        }

        let store: Arc<dyn UserStore> = match self.store {
            Some(StoreSource::Url { url, migrate }) => {
                let conn = connect_db(&url, self.store_timeout, migrate).await?;
                Arc::new(SeaUserStore::new(conn))
            }
            Some(StoreSource::Custom(store)) => store,
            None => return Err(AppError::config("no user store configured")),
        };

        let accounts = AccountService::new(store, security_config)
            .with_hasher(self.hasher)
            .with_store_timeout(self.store_timeout);
        Ok(AppState::new(accounts))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
