use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;
use crate::validation::{FieldError, ValidationErrors};

/// Message shared by every credential failure so usernames cannot be enumerated.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Failure body: the standard envelope plus diagnostics.
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub status: &'static str,
    pub message: String,
    pub code: &'static str,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {errors}")]
    Validation { errors: ValidationErrors },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedMalformedJwt")]
    UnauthorizedMalformedJwt,
    #[error("UnauthorizedInvalidJwt")]
    UnauthorizedInvalidJwt,
    #[error("UnauthorizedExpiredJwt")]
    UnauthorizedExpiredJwt,
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Database error: {detail}")]
    Db { code: ErrorCode, detail: String },
    #[error("Database timeout: {detail}")]
    DbTimeout { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::BadRequest { code, .. } => *code,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::UnauthorizedMissingBearer => ErrorCode::UnauthorizedMissingBearer,
            AppError::UnauthorizedMalformedJwt => ErrorCode::UnauthorizedMalformedJwt,
            AppError::UnauthorizedInvalidJwt => ErrorCode::UnauthorizedInvalidJwt,
            AppError::UnauthorizedExpiredJwt => ErrorCode::UnauthorizedExpiredJwt,
            AppError::NotFound { code, .. } => *code,
            AppError::Db { code, .. } => *code,
            AppError::DbTimeout { .. } => ErrorCode::DbTimeout,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing message. Internal details never leave the process.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { errors } => errors.to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::UnauthorizedMissingBearer => "Missing token".to_string(),
            AppError::UnauthorizedMalformedJwt => "Malformed token".to_string(),
            AppError::UnauthorizedInvalidJwt => "Invalid token".to_string(),
            AppError::UnauthorizedExpiredJwt => "Token expired".to_string(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Db { detail, .. } => detail.clone(),
            AppError::DbTimeout { .. } => "Database operation timed out".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Server misconfigured".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedMalformedJwt
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Db { .. }
            | AppError::DbTimeout { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        Self::Validation { errors }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Db {
            code,
            detail: detail.into(),
        }
    }

    pub fn db_timeout(detail: impl Into<String>) -> Self {
        Self::DbTimeout {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_malformed_jwt() -> Self {
        Self::UnauthorizedMalformedJwt
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::UnauthorizedInvalidJwt
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::UnauthorizedExpiredJwt
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(errors) => AppError::invalid(errors),
            DomainError::InvalidCredentials => AppError::invalid_credentials(),
            DomainError::Conflict(ConflictKind::UniqueUsername, detail) => {
                AppError::db(ErrorCode::UniqueUsername, detail)
            }
            DomainError::Conflict(ConflictKind::UniqueEmail, detail) => {
                AppError::db(ErrorCode::UniqueEmail, detail)
            }
            DomainError::Conflict(_, detail) => AppError::db(ErrorCode::UniqueViolation, detail),
            // users are the only resource this service looks up
            DomainError::NotFound(_, detail) => AppError::not_found(ErrorCode::UserNotFound, detail),
            DomainError::Infra(InfraErrorKind::Timeout, detail) => AppError::db_timeout(detail),
            DomainError::Infra(InfraErrorKind::DbUnavailable, detail) => {
                AppError::db(ErrorCode::DbUnavailable, detail)
            }
            DomainError::Infra(InfraErrorKind::DataCorruption, detail) => {
                AppError::db(ErrorCode::DataCorruption, detail)
            }
            DomainError::Infra(InfraErrorKind::Crypto, detail) => AppError::internal(detail),
            DomainError::Infra(_, detail) => AppError::db(ErrorCode::DbError, detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = %self.code(), error = %self, "request failed");
        }

        let field_errors = match self {
            AppError::Validation { errors } => errors.iter().cloned().collect(),
            _ => Vec::new(),
        };

        let envelope = ErrorEnvelope {
            ok: false,
            status: "failed",
            message: self.message(),
            code: self.code().as_str(),
            trace_id: trace_id.clone(),
            errors: field_errors,
        };

        HttpResponse::build(status)
            .content_type("application/json")
            .insert_header(("x-trace-id", trace_id))
            .json(envelope)
    }
}
