/// Persistence layer
///
/// The services only talk to these traits. `PgStore` is the production
/// backend; `InMemoryStore` has the same semantics and backs the tests and
/// local runs without a database.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Chirp, RefreshToken, SortDirection, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with a conflict if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Fails with not-found for an unknown user, conflict for a taken email.
    async fn update_user(
        &self,
        user_id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    /// Sets the privilege flag. Fails with not-found for an unknown user.
    async fn upgrade_to_red(&self, user_id: Uuid) -> Result<(), AppError>;

    /// Deletes every user together with their chirps and refresh tokens.
    async fn reset_users(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError>;

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Marks the token revoked. Unknown or already revoked tokens are left
    /// untouched and are not an error.
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError>;

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        sort: SortDirection,
    ) -> Result<Vec<Chirp>, AppError>;

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, AppError>;

    /// Fails with not-found if nothing was deleted.
    async fn delete_chirp(&self, chirp_id: Uuid) -> Result<(), AppError>;
}

/// Everything the application persists.
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {}

impl<T> Store for T where T: UserStore + RefreshTokenStore + ChirpStore {}
