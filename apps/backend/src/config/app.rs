//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::config::db::db_url;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

const MIN_JWT_SECRET_LEN: usize = 32;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Upper bound on every store call made while serving a request
    pub db_timeout: Duration,
    /// Apply pending migrations at startup
    pub auto_migrate: bool,
    pub security: SecurityConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port_str = lookup("BACKEND_PORT").unwrap_or_else(|| "8000".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let secret = match lookup("BACKEND_JWT_SECRET") {
            Some(s) if s.len() >= MIN_JWT_SECRET_LEN => s,
            Some(_) => {
                return Err(AppError::config(format!(
                    "BACKEND_JWT_SECRET is too short. It should be at least {MIN_JWT_SECRET_LEN} characters."
                )))
            }
            None => return Err(AppError::config("BACKEND_JWT_SECRET must be set.")),
        };

        let mut security = SecurityConfig::new(secret.into_bytes());
        if let Some(kid) = lookup("BACKEND_JWT_KEY_ID").filter(|k| !k.is_empty()) {
            security = security.with_key_id(kid);
        }
        if let Some(previous) = lookup("BACKEND_JWT_PREVIOUS_KEYS") {
            for (kid, secret) in parse_previous_keys(&previous)? {
                security = security.with_previous_key(kid, secret.into_bytes());
            }
        }

        let db_timeout_secs = match lookup("DB_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                AppError::config(format!(
                    "DB_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_DB_TIMEOUT_SECS,
        };

        let auto_migrate = lookup("AUTO_MIGRATE")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Config {
            host,
            port,
            database_url: db_url(&lookup)?,
            db_timeout: Duration::from_secs(db_timeout_secs),
            auto_migrate,
            security,
        })
    }
}

/// Parses `kid=secret,kid=secret`.
fn parse_previous_keys(raw: &str) -> Result<Vec<(String, String)>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((kid, secret)) if !kid.trim().is_empty() && !secret.is_empty() => {
                Ok((kid.trim().to_string(), secret.to_string()))
            }
            _ => Err(AppError::config(
                "BACKEND_JWT_PREVIOUS_KEYS entries must look like kid=secret",
            )),
        })
        .collect()
}
