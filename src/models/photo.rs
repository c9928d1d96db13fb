// src/models/photo.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum number of photos cached per beach
pub const MAX_PHOTOS_PER_BEACH: usize = 5;

/// How long a cached photo is served before it must be refreshed
pub const PHOTO_RETENTION_DAYS: i64 = 30;

/// Photos expiring within this window are picked up by the refresher
pub const EXPIRY_LOOKAHEAD_DAYS: i64 = 3;

/// Cached photo for a beach
/// DOCUMENTATION: Identified by (beach_id, photo_index); upserting the same pair
/// replaces the storage URL and timestamps of the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BeachPhoto {
    pub beach_id: String,
    pub photo_index: i32,
    pub storage_url: String,
    pub attribution: Option<String>,
    pub attribution_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl BeachPhoto {
    /// Strictly before `cutoff`, matching the repository's expiry scan
    pub fn expires_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.expires_at < cutoff
    }
}

/// Stable blob path for a beach photo; re-uploads overwrite in place
pub fn photo_blob_path(beach_id: &str, photo_index: i32) -> String {
    format!("beaches/{}/photo-{}.jpg", beach_id, photo_index)
}

pub fn photo_expiry(cached_at: DateTime<Utc>) -> DateTime<Utc> {
    cached_at + Duration::days(PHOTO_RETENTION_DAYS)
}

/// Photos expiring before this instant are refresh candidates
pub fn refresh_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(EXPIRY_LOOKAHEAD_DAYS)
}
