/// Account routes

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::SessionService;

/// Body of sign-up and account update requests
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let user = sessions.create_user(&form.email, &form.password).await?;
    Ok(HttpResponse::Created().json(user))
}

/// PUT /api/users
///
/// Replaces the caller's email and password.
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 401: Missing or invalid access token
/// - 404: The account no longer exists
/// - 409: Email taken by another account
pub async fn update_user(
    caller: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let user = sessions
        .update_account(caller.user_id(), &form.email, &form.password)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}
