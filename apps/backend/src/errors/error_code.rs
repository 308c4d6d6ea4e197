//! Error codes for the accounts API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Every code
//! is SCREAMING_SNAKE_CASE and appears verbatim in the `code` field of error
//! envelopes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Username/password pair rejected (deliberately generic)
    InvalidCredentials,
    /// No bearer credential presented
    UnauthorizedMissingBearer,
    /// Bearer credential is not a decodable token
    UnauthorizedMalformedJwt,
    /// Signature, key or claims did not verify
    UnauthorizedInvalidJwt,
    /// Token is past its expiration instant
    UnauthorizedExpiredJwt,

    // Request validation
    /// One or more fields violated their constraints
    ValidationError,
    /// Body could not be read or decoded
    BadRequest,

    // Not found
    UserNotFound,

    // Persistence
    /// Username already registered
    UniqueUsername,
    /// Email already registered
    UniqueEmail,
    /// Unclassified unique constraint violation
    UniqueViolation,
    DbError,
    DbUnavailable,
    /// Store did not answer within the configured bound
    DbTimeout,
    DataCorruption,

    // System
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Canonical string as it appears in responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedMalformedJwt => "UNAUTHORIZED_MALFORMED_JWT",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",

            Self::UniqueUsername => "UNIQUE_USERNAME",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::InvalidCredentials,
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedMalformedJwt,
        Self::UnauthorizedInvalidJwt,
        Self::UnauthorizedExpiredJwt,
        Self::ValidationError,
        Self::BadRequest,
        Self::UserNotFound,
        Self::UniqueUsername,
        Self::UniqueEmail,
        Self::UniqueViolation,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
