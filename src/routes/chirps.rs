/// Chirp routes

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::models::SortDirection;
use crate::services::ChirpService;
use crate::validators::clean_chirp_body;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct CleanedChirpResponse {
    pub cleaned_body: String,
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

/// A path id that is not a UUID cannot name a chirp.
fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Chirp not found"))
}

/// POST /api/validate_chirp
///
/// Runs the content filter without storing anything.
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = clean_chirp_body(&form.body)?;
    Ok(HttpResponse::Ok().json(CleanedChirpResponse { cleaned_body }))
}

/// POST /api/chirps
///
/// # Errors
/// - 400: Empty body or longer than 140 characters
/// - 401: Missing or invalid access token
pub async fn create_chirp(
    caller: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    chirps: web::Data<ChirpService>,
) -> Result<HttpResponse, AppError> {
    let chirp = chirps.create_chirp(caller.user_id(), &form.body).await?;
    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
///
/// # Errors
/// - 400: `author_id` is not a UUID or `sort` is neither `asc` nor `desc`
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    chirps: web::Data<ChirpService>,
) -> Result<HttpResponse, AppError> {
    let sort = SortDirection::parse(query.sort.as_deref())?;
    let author_id = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| ValidationError::InvalidFormat("author_id".to_string()))?,
        ),
    };

    let list = chirps.list_chirps(author_id, sort).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<ChirpService>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    let chirp = chirps.get_chirp(chirp_id).await?;
    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    caller: AuthenticatedUser,
    path: web::Path<String>,
    chirps: web::Data<ChirpService>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    chirps.delete_chirp(caller.user_id(), chirp_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
