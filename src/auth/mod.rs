/// Authentication module
///
/// Password hashing, access token issuance/validation, refresh token
/// generation and the authorization gate.

mod claims;
mod gate;
mod jwt;
mod password;
mod refresh_token;

pub use claims::{Claims, ISSUER};
pub use gate::{authorize_ownership, extract_api_key, extract_bearer_token, AuthGate};
pub use jwt::{decode_access_token, issue_access_token, validate_access_token};
pub use jwt::MAX_ACCESS_TOKEN_TTL_SECONDS;
pub use password::{hash_password, verify_password, BCRYPT_COST};
pub use refresh_token::generate_refresh_token;
