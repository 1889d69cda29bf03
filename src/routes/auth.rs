/// Session routes
///
/// Login, access token refresh and refresh token revocation. Refresh and
/// revoke take the refresh token from the `Authorization: Bearer` header.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::extract_bearer_token;
use crate::error::AppError;
use crate::models::User;
use crate::services::SessionService;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

/// Logged-in user together with both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 400: Malformed body
/// - 401: Unknown email or wrong password (same message for both)
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let outcome = sessions
        .login(&form.email, &form.password, form.expires_in_seconds)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: outcome.user,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// # Errors
/// - 401: Missing, unknown, expired or revoked refresh token
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer_token(req.headers())?;
    let token = sessions.refresh_access_token(refresh_token).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 401: No refresh token in the `Authorization` header
pub async fn revoke(
    req: HttpRequest,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer_token(req.headers())?;
    sessions.revoke(refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}
