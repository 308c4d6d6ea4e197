use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::claims::IdentityClaim;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims carried by issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Why a presented token was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("no token presented")]
    NoToken,
    /// Not a structurally valid JWT
    #[error("token is malformed")]
    Malformed,
    /// Well-formed but the signature, key id or claims do not check out
    #[error("token is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

impl From<TokenRejection> for AppError {
    fn from(r: TokenRejection) -> Self {
        match r {
            TokenRejection::NoToken => AppError::unauthorized_missing_bearer(),
            TokenRejection::Malformed => AppError::unauthorized_malformed_jwt(),
            TokenRejection::Invalid => AppError::unauthorized_invalid_jwt(),
            TokenRejection::Expired => AppError::unauthorized_expired_jwt(),
        }
    }
}

/// Mint a signed access token for `email`, valid for `security.token_ttl` from `now`.
pub fn mint_access_token(
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if !security.has_secret() {
        return Err(AppError::config("JWT signing secret is empty"));
    }

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = Claims {
        email: email.to_string(),
        iat,
        exp,
    };

    let mut header = Header::new(security.algorithm);
    header.kid = Some(security.key_id().to_string());

    encode(&header, &claims, &security.encoding_key())
        .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Three non-empty base64url segments separated by dots.
fn is_compact_jws(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|s| {
            !s.is_empty()
                && s
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}

/// Verify signature and expiry, returning the claims.
///
/// Only input that is not shaped like a JWS is `Malformed`. Any alteration of a
/// well-shaped token, header included, is `Invalid`.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<Claims, TokenRejection> {
    if !is_compact_jws(token) {
        return Err(TokenRejection::Malformed);
    }

    let header = decode_header(token).map_err(|_| TokenRejection::Invalid)?;
    if header.alg != security.algorithm {
        return Err(TokenRejection::Invalid);
    }

    let key = security
        .decoding_key(header.kid.as_deref())
        .ok_or(TokenRejection::Invalid)?;

    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenRejection::Expired,
            _ => TokenRejection::Invalid,
        })
}

/// Resolve an `Authorization` header value to the caller's identity.
///
/// The `Bearer ` prefix is optional; a bare token is accepted too.
pub fn authenticate_bearer(
    authorization: Option<&str>,
    security: &SecurityConfig,
) -> Result<IdentityClaim, TokenRejection> {
    let raw = authorization.unwrap_or_default().trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };

    if token.is_empty() {
        return Err(TokenRejection::NoToken);
    }

    let claims = verify_access_token(token, security)?;
    Ok(IdentityClaim {
        email: claims.email,
        exp: claims.exp,
    })
}
