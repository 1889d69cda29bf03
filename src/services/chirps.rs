/// Chirp Service
///
/// Posting, listing and deleting chirps. Bodies pass through the content
/// filter before they are stored.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorize_ownership;
use crate::error::AppError;
use crate::models::{Chirp, SortDirection};
use crate::store::Store;
use crate::validators::clean_chirp_body;

#[derive(Clone)]
pub struct ChirpService {
    store: Arc<dyn Store>,
}

impl ChirpService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// # Errors
    /// - Validation: empty body or more than 140 characters
    pub async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let cleaned = clean_chirp_body(body)?;
        let chirp = self.store.create_chirp(&cleaned, user_id).await?;

        tracing::info!(chirp_id = %chirp.id, user_id = %user_id, "Chirp created");
        Ok(chirp)
    }

    pub async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        sort: SortDirection,
    ) -> Result<Vec<Chirp>, AppError> {
        self.store.list_chirps(author_id, sort).await
    }

    pub async fn get_chirp(&self, chirp_id: Uuid) -> Result<Chirp, AppError> {
        self.store
            .get_chirp(chirp_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chirp not found"))
    }

    /// # Errors
    /// - NotFound: no such chirp
    /// - Forbidden: the caller is not the author
    pub async fn delete_chirp(&self, caller_id: Uuid, chirp_id: Uuid) -> Result<(), AppError> {
        let chirp = self.get_chirp(chirp_id).await?;
        authorize_ownership(chirp.user_id, caller_id)?;

        self.store.delete_chirp(chirp_id).await?;
        tracing::info!(chirp_id = %chirp_id, user_id = %caller_id, "Chirp deleted");
        Ok(())
    }
}
