use super::security_config::SecurityConfig;
use crate::services::accounts::AccountService;

/// Shared, cheaply clonable application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    /// Verification keys for the bearer-token middleware
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(accounts: AccountService) -> Self {
        let security = accounts.security().clone();
        Self { accounts, security }
    }
}
