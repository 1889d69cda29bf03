use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl Chirp {
    pub fn new(body: String, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body,
            user_id,
        }
    }
}

/// Ordering of chirp listings by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses the `sort` query parameter; absent means ascending.
    pub fn parse(value: Option<&str>) -> Result<Self, ValidationError> {
        match value.map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("asc") => Ok(SortDirection::Asc),
            Some("desc") => Ok(SortDirection::Desc),
            Some(_) => Err(ValidationError::InvalidFormat("sort".to_string())),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}
