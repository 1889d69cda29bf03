use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, UserStore};
use crate::error::AppError;
use crate::models::{Chirp, RefreshToken, SortDirection, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<String, RefreshToken>,
    chirps: HashMap<Uuid, Chirp>,
}

/// Process-local store with the same constraints as the SQL schema:
/// unique emails, cascading deletes from users, revocation without deletion.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("In-memory store lock poisoned".to_string()))
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<Uuid>) -> bool {
    tables
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if email_taken(&tables, email, None) {
            return Err(AppError::conflict("Email already exists"));
        }

        let user = User::new(email.to_string(), password_hash.to_string());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if email_taken(&tables, email, Some(user_id)) {
            return Err(AppError::conflict("Email already exists"));
        }

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_to_red(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn reset_users(&self) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        *tables = Tables::default();
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::Internal(
                "refresh token references an unknown user".to_string(),
            ));
        }
        if tables.refresh_tokens.contains_key(token) {
            return Err(AppError::conflict("Refresh token already exists"));
        }

        let record = RefreshToken::new(token.to_string(), user_id, expires_at);
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let tables = self.lock()?;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if let Some(record) = tables.refresh_tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for InMemoryStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::Internal(
                "chirp references an unknown user".to_string(),
            ));
        }

        let chirp = Chirp::new(body.to_string(), user_id);
        tables.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        sort: SortDirection,
    ) -> Result<Vec<Chirp>, AppError> {
        let tables = self.lock()?;
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .values()
            .filter(|c| author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();

        chirps.sort_by_key(|c| c.created_at);
        if sort == SortDirection::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, AppError> {
        let tables = self.lock()?;
        Ok(tables.chirps.get(&chirp_id).cloned())
    }

    async fn delete_chirp(&self, chirp_id: Uuid) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables
            .chirps
            .remove(&chirp_id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Chirp not found"))
    }
}
