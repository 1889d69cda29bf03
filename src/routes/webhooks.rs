/// Payment provider webhook
///
/// The API key is checked before the body is looked at, so unauthenticated
/// callers always get a 401 regardless of what they send.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthGate;
use crate::error::{AppError, ValidationError};
use crate::services::SessionService;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Deserialize, Default)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/polka/webhooks
///
/// Only `user.upgraded` has an effect; every other event is acknowledged
/// with 204 and ignored.
///
/// # Errors
/// - 400: Malformed body or user id
/// - 401: Missing or wrong API key
/// - 404: Unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    gate: web::Data<AuthGate>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    gate.verify_webhook_key(req.headers())?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&event.data.user_id)
        .map_err(|_| ValidationError::InvalidFormat("user_id".to_string()))?;
    sessions.upgrade_to_red(user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
