use std::collections::HashMap;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

/// Default lifetime of an issued access token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Token signing configuration.
///
/// Tokens are signed with the active key and carry its id in the `kid`
/// header. Previous keys still verify tokens issued before a rotation.
#[derive(Clone)]
pub struct SecurityConfig {
    key_id: String,
    jwt_secret: Vec<u8>,
    previous_keys: HashMap<String, Vec<u8>>,
    pub algorithm: Algorithm,
    pub token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            key_id: "primary".to_string(),
            jwt_secret: jwt_secret.into(),
            previous_keys: HashMap::new(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = key_id.into();
        self
    }

    /// Keeps accepting tokens signed under a retired key.
    pub fn with_previous_key(mut self, key_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        self.previous_keys.insert(key_id.into(), secret.into());
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn has_secret(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.jwt_secret)
    }

    /// Key for a token's `kid`. A token without `kid` is checked against the active key.
    pub fn decoding_key(&self, kid: Option<&str>) -> Option<DecodingKey> {
        match kid {
            None => Some(DecodingKey::from_secret(&self.jwt_secret)),
            Some(kid) if kid == self.key_id => Some(DecodingKey::from_secret(&self.jwt_secret)),
            Some(kid) => self
                .previous_keys
                .get(kid)
                .map(|secret| DecodingKey::from_secret(secret)),
        }
    }

    pub fn for_tests() -> Self {
        Self::new(b"test_secret_key_for_testing_purposes_only".to_vec())
    }
}

// secrets stay out of Debug output
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("key_id", &self.key_id)
            .field("previous_key_ids", &self.previous_keys.keys().collect::<Vec<_>>())
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}
