//! Identity attached to a request once its bearer token has been verified.

use serde::{Deserialize, Serialize};

/// Inserted into request extensions by `JwtExtract`; read by `CurrentUser`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub email: String,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
