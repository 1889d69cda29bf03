/// Authenticated caller extractor
///
/// Handlers that take an `AuthenticatedUser` argument only run for requests
/// carrying a valid bearer access token; every other route stays public.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::AuthGate;
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let gate = match req.app_data::<web::Data<AuthGate>>() {
            Some(gate) => gate,
            None => {
                return ready(Err(AppError::Internal(
                    "AuthGate is not registered as app data".to_string(),
                )))
            }
        };

        ready(
            gate.authenticate(req.headers())
                .map(AuthenticatedUser)
                .map_err(AppError::from),
        )
    }
}
