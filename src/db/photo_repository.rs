// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Cached photo records keyed by (beach_id, photo_index)

use crate::errors::BeachError;
use crate::models::BeachPhoto;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const PHOTO_COLUMNS: &str = r#"
    beach_id, photo_index, storage_url, attribution, attribution_url,
    width, height, cached_at, expires_at
"#;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Insert or replace the photo at an index
    /// DOCUMENTATION: The unique (beach_id, photo_index) constraint keeps at most one
    /// record per slot, so repeated refreshes never accumulate duplicates.
    pub async fn upsert_photo(pool: &PgPool, photo: &BeachPhoto) -> Result<(), BeachError> {
        sqlx::query(
            r#"
            INSERT INTO beach_photos (
                beach_id, photo_index, storage_url, attribution, attribution_url,
                width, height, cached_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (beach_id, photo_index) DO UPDATE
            SET storage_url = EXCLUDED.storage_url,
                attribution = EXCLUDED.attribution,
                attribution_url = EXCLUDED.attribution_url,
                width = EXCLUDED.width,
                height = EXCLUDED.height,
                cached_at = EXCLUDED.cached_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&photo.beach_id)
        .bind(photo.photo_index)
        .bind(&photo.storage_url)
        .bind(&photo.attribution)
        .bind(&photo.attribution_url)
        .bind(photo.width)
        .bind(photo.height)
        .bind(photo.cached_at)
        .bind(photo.expires_at)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to upsert photo {}/{}: {}",
                photo.beach_id,
                photo.photo_index,
                e
            );
            BeachError::DatabaseError(format!("Upsert photo failed: {}", e))
        })?;

        Ok(())
    }

    /// Photos whose `expires_at` is strictly before the cutoff
    pub async fn list_expiring_before(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BeachPhoto>, BeachError> {
        let sql = format!(
            "SELECT {} FROM beach_photos WHERE expires_at < $1 ORDER BY beach_id, photo_index",
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, BeachPhoto>(&sql)
            .bind(cutoff)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list expiring photos: {}", e);
                BeachError::DatabaseError(format!("List expiring photos failed: {}", e))
            })
    }

    /// Get photos for a beach, ordered by index
    pub async fn get_photos_by_beach(
        pool: &PgPool,
        beach_id: &str,
    ) -> Result<Vec<BeachPhoto>, BeachError> {
        let sql = format!(
            "SELECT {} FROM beach_photos WHERE beach_id = $1 ORDER BY photo_index ASC",
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, BeachPhoto>(&sql)
            .bind(beach_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch photos for beach {}: {}", beach_id, e);
                BeachError::DatabaseError(format!("Fetch photos failed: {}", e))
            })
    }

    pub async fn delete_photo(
        pool: &PgPool,
        beach_id: &str,
        photo_index: i32,
    ) -> Result<u64, BeachError> {
        let result = sqlx::query(
            r#"
            DELETE FROM beach_photos
            WHERE beach_id = $1 AND photo_index = $2
            "#,
        )
        .bind(beach_id)
        .bind(photo_index)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to delete photo {}/{}: {}", beach_id, photo_index, e);
            BeachError::DatabaseError(format!("Delete photo failed: {}", e))
        })?;

        Ok(result.rows_affected())
    }
}
