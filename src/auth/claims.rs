/// JWT Claims structure
///
/// Registered claims only (RFC 7519); the subject is the user id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Issuer stamped into, and required on, every access token.
pub const ISSUER: &str = "chirpy";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Subject (user ID as UUID string)
    pub sub: String,
}

impl Claims {
    /// Claims for `user_id` valid for `ttl_seconds` from now.
    pub fn new(user_id: Uuid, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + ttl_seconds,
            sub: user_id.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenMalformed` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenMalformed)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}
