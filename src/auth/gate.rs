/// Authorization Gate
///
/// Pulls credentials out of the `Authorization` header and turns them into a
/// verified identity or a typed rejection.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use uuid::Uuid;

use crate::auth::jwt::validate_access_token;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

fn extract_with_prefix<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(prefix))
        .filter(|credential| !credential.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_with_prefix(headers, BEARER_PREFIX)
}

/// `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_with_prefix(headers, API_KEY_PREFIX)
}

/// Only the owner of a resource may mutate it.
pub fn authorize_ownership(resource_owner_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
    if resource_owner_id == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("not the owner of this resource".to_string()))
    }
}

/// Checks inbound credentials against the process-wide secret and API key.
#[derive(Clone)]
pub struct AuthGate {
    jwt_secret: String,
    polka_key: String,
}

impl AuthGate {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            polka_key: settings.polka_key.clone(),
        }
    }

    /// Resolve the caller from a bearer access token.
    ///
    /// Every failure is reported as `AuthError::Unauthorized`; the specific
    /// cause only goes to the log.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer_token(headers).map_err(|e| {
            tracing::debug!(reason = %e, "Bearer token not present");
            AuthError::Unauthorized
        })?;

        validate_access_token(token, &self.jwt_secret).map_err(|e| {
            tracing::warn!(reason = %e, "Access token rejected");
            AuthError::Unauthorized
        })
    }

    /// Gate for the payment provider webhook.
    pub fn verify_webhook_key(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let key = extract_api_key(headers)?;
        if key != self.polka_key {
            tracing::warn!("Webhook called with a non-matching api key");
            return Err(AuthError::ApiKeyMismatch);
        }
        Ok(())
    }
}
