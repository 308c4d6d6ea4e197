pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::IdentityClaim;
pub use jwt::{authenticate_bearer, mint_access_token, verify_access_token, Claims, TokenRejection};
pub use password::CredentialHasher;
