// src/db/beach_repository.rs
// DOCUMENTATION: Database access for the beaches table
// PURPOSE: Sparse upserts from the seed importer and read queries for the directory API

use crate::errors::BeachError;
use crate::models::{Beach, BeachDirectoryEntry, BeachRecord, DirectoryQuery};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

const BEACH_COLUMNS: &str = r#"
    id, name, town, region, island, lat, lng, beach_type, best_for,
    access_type, parking_info, description, attributes, is_active,
    created_at, updated_at
"#;

pub struct BeachRepository;

impl BeachRepository {
    /// Upsert a beach keyed by its provider place id
    /// DOCUMENTATION: Seed-owned columns are overwritten; optional text and coordinates
    /// only when the new record carries them; `attributes` is merged key by key so
    /// previously enriched data is never clobbered with nulls.
    pub async fn upsert_beach(pool: &PgPool, record: &BeachRecord) -> Result<(), BeachError> {
        sqlx::query(
            r#"
            INSERT INTO beaches (
                id, name, town, region, island, lat, lng, beach_type, best_for,
                access_type, parking_info, description, attributes, is_active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW())
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                town = EXCLUDED.town,
                region = EXCLUDED.region,
                island = EXCLUDED.island,
                lat = COALESCE(EXCLUDED.lat, beaches.lat),
                lng = COALESCE(EXCLUDED.lng, beaches.lng),
                beach_type = EXCLUDED.beach_type,
                best_for = EXCLUDED.best_for,
                access_type = EXCLUDED.access_type,
                parking_info = COALESCE(EXCLUDED.parking_info, beaches.parking_info),
                description = COALESCE(EXCLUDED.description, beaches.description),
                attributes = beaches.attributes || EXCLUDED.attributes,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            "#,
        )
        .bind(&record.id) // $1
        .bind(&record.name) // $2
        .bind(&record.town) // $3
        .bind(record.region.as_str()) // $4
        .bind(record.island.as_str()) // $5
        .bind(record.lat) // $6
        .bind(record.lng) // $7
        .bind(record.beach_type.as_str()) // $8
        .bind(&record.best_for) // $9
        .bind(&record.access_type) // $10
        .bind(&record.parking_info) // $11
        .bind(&record.description) // $12
        .bind(Json(&record.attributes)) // $13
        .bind(record.is_active) // $14
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert beach {}: {}", record.id, e);
            BeachError::DatabaseError(format!("Upsert beach {} failed: {}", record.id, e))
        })?;

        Ok(())
    }

    /// All active beaches, in a stable order
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Beach>, BeachError> {
        let sql = format!(
            "SELECT {} FROM beaches WHERE is_active = true ORDER BY id ASC",
            BEACH_COLUMNS
        );

        sqlx::query_as::<_, Beach>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list active beaches: {}", e);
                BeachError::DatabaseError(format!("List beaches failed: {}", e))
            })
    }

    /// Retrieve an active beach by id
    pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Beach, BeachError> {
        let sql = format!(
            "SELECT {} FROM beaches WHERE id = $1 AND is_active = true",
            BEACH_COLUMNS
        );

        sqlx::query_as::<_, Beach>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching beach {}: {}", id, e);
                BeachError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Beach not found: {}", id);
                BeachError::NotFound(format!("Beach '{}' not found", id))
            })
    }

    /// Directory listing with optional filters
    /// DOCUMENTATION: Used by GET /api/beaches; joins the rating and the first photo
    pub async fn search(
        pool: &PgPool,
        query: &DirectoryQuery,
    ) -> Result<Vec<BeachDirectoryEntry>, BeachError> {
        let mut builder = Self::directory_query(query);

        log::debug!("Executing directory query: {}", builder.sql());

        let entries = builder
            .build_query_as::<BeachDirectoryEntry>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Directory query error: {}", e);
                BeachError::DatabaseError(e.to_string())
            })?;

        log::info!("Directory query returned {} beaches", entries.len());
        Ok(entries)
    }

    fn directory_query(query: &DirectoryQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT
                b.id, b.name, b.town, b.region, b.island, b.lat, b.lng,
                b.beach_type, b.best_for, b.access_type, b.parking_info, b.description,
                r.rating, r.rating_count,
                photo.storage_url AS primary_photo_url,
                photo.attribution AS primary_photo_attribution
            FROM beaches b
            LEFT JOIN beach_ratings r ON r.beach_id = b.id
            LEFT JOIN LATERAL (
                SELECT storage_url, attribution
                FROM beach_photos
                WHERE beach_id = b.id
                ORDER BY photo_index ASC
                LIMIT 1
            ) photo ON true
            WHERE b.is_active = true
            "#,
        );

        if let Some(island) = non_empty(&query.island) {
            builder.push(" AND b.island = ").push_bind(island);
        }

        if let Some(region) = non_empty(&query.region) {
            builder.push(" AND b.region = ").push_bind(region);
        }

        if let Some(beach_type) = non_empty(&query.beach_type) {
            builder.push(" AND b.beach_type = ").push_bind(beach_type);
        }

        if let Some(best_for) = non_empty(&query.best_for) {
            builder.push(" AND ").push_bind(best_for).push(" = ANY(b.best_for)");
        }

        if let Some(q) = non_empty(&query.q) {
            let pattern = format!("%{}%", escape_like(&q));
            builder
                .push(" AND (b.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.town ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder.push(" ORDER BY r.rating DESC NULLS LAST, b.name ASC");
        builder
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
