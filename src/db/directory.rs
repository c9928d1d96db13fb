// src/db/directory.rs
// DOCUMENTATION: Directory store seam used by the refresh jobs
// PURPOSE: Keep the importer and refreshers independent of Postgres so they can run
// against an in-memory store in tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{BeachRepository, PhotoRepository, RatingRepository};
use crate::errors::BeachError;
use crate::models::{Beach, BeachPhoto, BeachRating, BeachRecord};

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn upsert_beach(&self, record: &BeachRecord) -> Result<(), BeachError>;

    async fn upsert_rating(&self, rating: &BeachRating) -> Result<(), BeachError>;

    async fn upsert_photo(&self, photo: &BeachPhoto) -> Result<(), BeachError>;

    async fn list_active_beaches(&self) -> Result<Vec<Beach>, BeachError>;

    /// Photos with `expires_at` strictly before `cutoff`
    async fn list_photos_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BeachPhoto>, BeachError>;

    async fn photos_for_beach(&self, beach_id: &str) -> Result<Vec<BeachPhoto>, BeachError>;

    async fn delete_photo(&self, beach_id: &str, photo_index: i32) -> Result<(), BeachError>;
}

/// Postgres-backed directory
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectory {
    async fn upsert_beach(&self, record: &BeachRecord) -> Result<(), BeachError> {
        BeachRepository::upsert_beach(&self.pool, record).await
    }

    async fn upsert_rating(&self, rating: &BeachRating) -> Result<(), BeachError> {
        RatingRepository::upsert_rating(&self.pool, rating).await
    }

    async fn upsert_photo(&self, photo: &BeachPhoto) -> Result<(), BeachError> {
        PhotoRepository::upsert_photo(&self.pool, photo).await
    }

    async fn list_active_beaches(&self) -> Result<Vec<Beach>, BeachError> {
        BeachRepository::list_active(&self.pool).await
    }

    async fn list_photos_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BeachPhoto>, BeachError> {
        PhotoRepository::list_expiring_before(&self.pool, cutoff).await
    }

    async fn photos_for_beach(&self, beach_id: &str) -> Result<Vec<BeachPhoto>, BeachError> {
        PhotoRepository::get_photos_by_beach(&self.pool, beach_id).await
    }

    async fn delete_photo(&self, beach_id: &str, photo_index: i32) -> Result<(), BeachError> {
        PhotoRepository::delete_photo(&self.pool, beach_id, photo_index)
            .await
            .map(|_| ())
    }
}
