/// JWT Token Generation and Validation
///
/// Access tokens are HS256 JWTs signed with the process-wide secret. They
/// are stateless: validity is signature plus expiry, nothing is looked up.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::{AppError, AuthError};

/// Upper bound, and default, for access token lifetimes in seconds.
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Issue an access token for `user_id` that expires `ttl_seconds` from now
///
/// # Errors
/// Returns an internal error if signing fails
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, ttl_seconds);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify signature, algorithm, issuer and expiry and return the claims
///
/// # Errors
/// - `TokenInvalid` for a bad signature, another algorithm or issuer
/// - `TokenExpired` once `exp` has passed (no leeway)
/// - `TokenMalformed` for anything that is not a well-formed token
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature => AuthError::TokenInvalid,
            _ => AuthError::TokenMalformed,
        }
    })
}

/// Validate an access token and return the user it was issued for
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    decode_access_token(token, secret)?.user_id()
}
