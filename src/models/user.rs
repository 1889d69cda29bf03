use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored account.
///
/// `password_hash` is never serialized; it only leaves the store to be
/// checked by the password hasher.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "hashed_password")]
    pub password_hash: String,
    pub is_chirpy_red: bool,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email,
            password_hash,
            is_chirpy_red: false,
        }
    }
}
