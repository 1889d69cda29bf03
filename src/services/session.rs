/// Session Service
///
/// Owns the account and session lifecycle: sign-up, login, access token
/// refresh, refresh token revocation, account updates and the paid upgrade.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{
    generate_refresh_token, hash_password, issue_access_token, verify_password,
    MAX_ACCESS_TOKEN_TTL_SECONDS,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::models::{RefreshToken, User};
use crate::store::Store;
use crate::validators::{validate_email, validate_password};

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Requested access token lifetimes outside `1..=3600` fall back to 3600.
pub fn clamp_ttl(requested: Option<i64>) -> i64 {
    match requested {
        Some(ttl) if ttl > 0 && ttl <= MAX_ACCESS_TOKEN_TTL_SECONDS => ttl,
        _ => MAX_ACCESS_TOKEN_TTL_SECONDS,
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn Store>,
    jwt_secret: String,
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, settings: &AuthSettings) -> Self {
        Self {
            store,
            jwt_secret: settings.jwt_secret.clone(),
        }
    }

    /// # Errors
    /// - Validation: bad email format or empty password
    /// - Conflict: email already registered
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_blocking(password).await?;
        let user = self.store.create_user(&email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Authenticates with email and password and opens a new session.
    ///
    /// Unknown email and wrong password produce the same error.
    ///
    /// # Errors
    /// - Auth(InvalidCredentials): unknown email or wrong password
    /// - Internal: hashing, signing, entropy or persistence failure
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl: Option<i64>,
    ) -> Result<LoginOutcome, AppError> {
        let user = match self.store.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
        if let Err(e) = verified {
            if matches!(e, AppError::Auth(AuthError::InvalidCredentials)) {
                tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            }
            return Err(e);
        }

        let ttl = clamp_ttl(requested_ttl);
        let access_token = issue_access_token(user.id, &self.jwt_secret, ttl)?;

        let refresh_token = generate_refresh_token()?;
        self.store
            .create_refresh_token(
                &refresh_token,
                user.id,
                RefreshToken::default_expiry(Utc::now()),
            )
            .await?;

        tracing::info!(user_id = %user.id, ttl_seconds = ttl, "User logged in");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a live refresh token for a fresh one-hour access token.
    ///
    /// # Errors
    /// - Auth(RefreshTokenNotFound | RefreshTokenExpired | RefreshTokenRevoked)
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .store
            .get_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        let user_id = record.check_usable(Utc::now()).map_err(|e| {
            tracing::warn!(user_id = %record.user_id, reason = %e, "Refresh token rejected");
            e
        })?;

        let access_token =
            issue_access_token(user_id, &self.jwt_secret, MAX_ACCESS_TOKEN_TTL_SECONDS)?;
        tracing::debug!(user_id = %user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revokes a refresh token. Unknown or already revoked tokens are a no-op.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        self.store.revoke_refresh_token(refresh_token).await?;
        tracing::info!("Refresh token revoked");
        Ok(())
    }

    /// # Errors
    /// - NotFound: the user no longer exists
    /// - Validation: bad email format or empty password
    /// - Conflict: email taken by another user
    pub async fn update_account(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self.store.get_user_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let email = validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_blocking(password).await?;
        let user = self.store.update_user(user_id, &email, &password_hash).await?;

        tracing::info!(user_id = %user_id, "Account updated");
        Ok(user)
    }

    pub async fn upgrade_to_red(&self, user_id: Uuid) -> Result<(), AppError> {
        self.store.upgrade_to_red(user_id).await?;
        tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(())
    }

    pub async fn reset_users(&self) -> Result<(), AppError> {
        self.store.reset_users().await?;
        tracing::warn!("All users deleted");
        Ok(())
    }
}

async fn hash_blocking(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{validate_access_token, AuthGate};
    use crate::store::{InMemoryStore, RefreshTokenStore};
    use actix_web::http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
    use chrono::Duration;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "session-test-secret".to_string(),
            polka_key: "polka".to_string(),
        }
    }

    fn service() -> (SessionService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (SessionService::new(store.clone(), &settings()), store)
    }

    fn assert_auth_error(result: Result<impl std::fmt::Debug, AppError>, expected: AuthError) {
        match result {
            Err(AppError::Auth(e)) => assert_eq!(e, expected),
            other => panic!("Expected {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_clamp_ttl() {
        assert_eq!(clamp_ttl(None), 3600);
        assert_eq!(clamp_ttl(Some(0)), 3600);
        assert_eq!(clamp_ttl(Some(-5)), 3600);
        assert_eq!(clamp_ttl(Some(5000)), 3600);
        assert_eq!(clamp_ttl(Some(3600)), 3600);
        assert_eq!(clamp_ttl(Some(120)), 120);
        assert_eq!(clamp_ttl(Some(1)), 1);
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates_and_bad_input() {
        let (service, _) = service();
        let user = service.create_user("a@x.com", "pw1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(!user.is_chirpy_red);
        assert_ne!(user.password_hash, "pw1");

        match service.create_user("a@x.com", "other").await {
            Err(AppError::Database(crate::error::DatabaseError::UniqueConstraintViolation(_))) => (),
            other => panic!("Expected conflict, got {:?}", other),
        }
        assert!(matches!(
            service.create_user("not-an-email", "pw1").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_user("b@x.com", "").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let (service, _) = service();
        service.create_user("a@x.com", "pw1").await.unwrap();

        let wrong_password = service.login("a@x.com", "wrong", None).await.unwrap_err();
        let unknown_email = service.login("nobody@x.com", "pw1", None).await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), "incorrect email or password");
        assert!(matches!(wrong_password, AppError::Auth(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, AppError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_honours_clamped_ttl() {
        let (service, _) = service();
        service.create_user("a@x.com", "pw1").await.unwrap();

        let outcome = service.login("a@x.com", "pw1", Some(120)).await.unwrap();
        let claims = crate::auth::decode_access_token(&outcome.access_token, &settings().jwt_secret)
            .unwrap();
        assert_eq!(claims.ttl_seconds(), 120);

        let outcome = service.login("a@x.com", "pw1", Some(5000)).await.unwrap();
        let claims = crate::auth::decode_access_token(&outcome.access_token, &settings().jwt_secret)
            .unwrap();
        assert_eq!(claims.ttl_seconds(), 3600);
    }

    #[tokio::test]
    async fn test_login_persists_refresh_token() {
        let (service, store) = service();
        let user = service.create_user("a@x.com", "pw1").await.unwrap();

        let outcome = service.login("a@x.com", "pw1", None).await.unwrap();
        assert_eq!(outcome.refresh_token.len(), 64);

        let record = store
            .get_refresh_token(&outcome.refresh_token)
            .await
            .unwrap()
            .expect("refresh token should be stored");
        assert_eq!(record.user_id, user.id);
        assert!(record.revoked_at.is_none());
        let lifetime = record.expires_at - record.created_at;
        assert!((lifetime - Duration::days(60)).num_seconds().abs() <= 1);
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_user() {
        let (service, _) = service();
        service.create_user("a@x.com", "pw1").await.unwrap();

        let first = service.login("a@x.com", "pw1", None).await.unwrap();
        let second = service.login("a@x.com", "pw1", None).await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);

        service.revoke(&first.refresh_token).await.unwrap();
        assert!(service.refresh_access_token(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_unknown_expired_and_revoked_tokens() {
        let (service, store) = service();
        let user = service.create_user("a@x.com", "pw1").await.unwrap();

        assert_auth_error(
            service.refresh_access_token("nope").await,
            AuthError::RefreshTokenNotFound,
        );

        store
            .create_refresh_token("expired", user.id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert_auth_error(
            service.refresh_access_token("expired").await,
            AuthError::RefreshTokenExpired,
        );

        store
            .create_refresh_token("revoked", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        service.revoke("revoked").await.unwrap();
        assert_auth_error(
            service.refresh_access_token("revoked").await,
            AuthError::RefreshTokenRevoked,
        );
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (service, _) = service();
        assert!(service.revoke("never-issued").await.is_ok());
        assert!(service.revoke("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_full_session_scenario() {
        let (service, _) = service();
        let gate = AuthGate::new(&settings());
        let user = service.create_user("a@x.com", "pw1").await.unwrap();

        let outcome = service.login("a@x.com", "pw1", None).await.unwrap();
        assert_eq!(outcome.user.id, user.id);

        let access_token = service
            .refresh_access_token(&outcome.refresh_token)
            .await
            .unwrap();
        assert_eq!(
            validate_access_token(&access_token, &settings().jwt_secret),
            Ok(user.id)
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token)).unwrap(),
        );
        assert_eq!(gate.authenticate(&headers), Ok(user.id));

        service.revoke(&outcome.refresh_token).await.unwrap();
        assert_auth_error(
            service.refresh_access_token(&outcome.refresh_token).await,
            AuthError::RefreshTokenRevoked,
        );
    }

    #[tokio::test]
    async fn test_update_account() {
        let (service, _) = service();
        let user = service.create_user("a@x.com", "pw1").await.unwrap();
        service.create_user("taken@x.com", "pw1").await.unwrap();

        let updated = service
            .update_account(user.id, "new@x.com", "pw2")
            .await
            .unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "new@x.com");

        assert!(service.login("new@x.com", "pw2", None).await.is_ok());
        assert!(service.login("new@x.com", "pw1", None).await.is_err());
        assert!(service.login("a@x.com", "pw2", None).await.is_err());

        match service.update_account(user.id, "taken@x.com", "pw3").await {
            Err(AppError::Database(crate::error::DatabaseError::UniqueConstraintViolation(_))) => (),
            other => panic!("Expected conflict, got {:?}", other),
        }
        match service.update_account(Uuid::new_v4(), "c@x.com", "pw3").await {
            Err(AppError::Database(crate::error::DatabaseError::NotFound(_))) => (),
            other => panic!("Expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upgrade_to_red() {
        let (service, store) = service();
        let user = service.create_user("a@x.com", "pw1").await.unwrap();

        service.upgrade_to_red(user.id).await.unwrap();
        let stored = crate::store::UserStore::get_user_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_chirpy_red);

        match service.upgrade_to_red(Uuid::new_v4()).await {
            Err(AppError::Database(crate::error::DatabaseError::NotFound(_))) => (),
            other => panic!("Expected not found, got {:?}", other),
        }
    }
}
