// src/db/rating_repository.rs
// DOCUMENTATION: Rating database operations
// PURPOSE: One row per beach, overwritten on every refresh

use crate::errors::BeachError;
use crate::models::BeachRating;
use sqlx::PgPool;

pub struct RatingRepository;

impl RatingRepository {
    /// Insert or replace the rating for a beach
    pub async fn upsert_rating(pool: &PgPool, rating: &BeachRating) -> Result<(), BeachError> {
        sqlx::query(
            r#"
            INSERT INTO beach_ratings (beach_id, rating, rating_count, refreshed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (beach_id) DO UPDATE
            SET rating = EXCLUDED.rating,
                rating_count = EXCLUDED.rating_count,
                refreshed_at = EXCLUDED.refreshed_at
            "#,
        )
        .bind(&rating.beach_id)
        .bind(rating.rating)
        .bind(rating.rating_count)
        .bind(rating.refreshed_at)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert rating for {}: {}", rating.beach_id, e);
            BeachError::DatabaseError(format!("Upsert rating failed: {}", e))
        })?;

        Ok(())
    }

    pub async fn get_by_beach(
        pool: &PgPool,
        beach_id: &str,
    ) -> Result<Option<BeachRating>, BeachError> {
        sqlx::query_as::<_, BeachRating>(
            r#"
            SELECT beach_id, rating, rating_count, refreshed_at
            FROM beach_ratings
            WHERE beach_id = $1
            "#,
        )
        .bind(beach_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch rating for {}: {}", beach_id, e);
            BeachError::DatabaseError(format!("Fetch rating failed: {}", e))
        })
    }
}
