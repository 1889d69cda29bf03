use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AuthError;

/// Lifetime of a refresh token from issuance.
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

/// Stored refresh token.
///
/// Created at login and only ever mutated by revocation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RefreshToken {
    #[serde(rename = "refresh_token")]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(token: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            token,
            created_at: now,
            updated_at: now,
            user_id,
            expires_at,
            revoked_at: None,
        }
    }

    pub fn default_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS)
    }

    /// Returns the owning user if the token can still mint access tokens.
    ///
    /// Expiry is checked before revocation.
    pub fn check_usable(&self, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        if now >= self.expires_at {
            return Err(AuthError::RefreshTokenExpired);
        }
        if self.revoked_at.is_some() {
            return Err(AuthError::RefreshTokenRevoked);
        }
        Ok(self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> RefreshToken {
        RefreshToken::new("abc".to_string(), Uuid::new_v4(), expires_at)
    }

    #[test]
    fn test_fresh_token_is_usable() {
        let now = Utc::now();
        let token = token_expiring_at(RefreshToken::default_expiry(now));

        assert_eq!(token.check_usable(now), Ok(token.user_id));
    }

    #[test]
    fn test_default_expiry_is_sixty_days() {
        let now = Utc::now();
        assert_eq!(RefreshToken::default_expiry(now) - now, Duration::days(60));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let token = token_expiring_at(now);

        assert_eq!(token.check_usable(now), Err(AuthError::RefreshTokenExpired));
        assert!(token.check_usable(now - Duration::seconds(1)).is_ok());
    }

    #[test]
    fn test_revoked_token_is_rejected_before_expiry() {
        let now = Utc::now();
        let mut token = token_expiring_at(now + Duration::days(1));
        token.revoked_at = Some(now);

        assert_eq!(token.check_usable(now), Err(AuthError::RefreshTokenRevoked));
    }

    #[test]
    fn test_expired_and_revoked_reports_expired() {
        let now = Utc::now();
        let mut token = token_expiring_at(now - Duration::days(1));
        token.revoked_at = Some(now - Duration::days(2));

        assert_eq!(token.check_usable(now), Err(AuthError::RefreshTokenExpired));
    }
}
