// src/services/photo_cache.rs
// DOCUMENTATION: Photo caching shared by the seed importer and the photo refresher
// PURPOSE: Download provider photos, upload them to blob storage and record them,
// then clean up whatever the new set superseded

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::BeachError;
use crate::models::{photo_blob_path, photo_expiry, BeachPhoto, MAX_PHOTOS_PER_BEACH};
use crate::services::{GooglePhoto, PipelineDeps, PHOTO_MAX_WIDTH_PX};

/// Shown when the provider gives no author for a photo
pub const FALLBACK_ATTRIBUTION: &str = "Google Maps User";

/// Result of replacing the photo set of one beach
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoSetOutcome {
    /// Photos uploaded and recorded
    pub cached: u32,
    /// Photos skipped because a download, upload or write failed
    pub failed: u32,
    /// Superseded blobs removed from storage
    pub blobs_deleted: u32,
    /// Records dropped because the provider returned fewer photos than before
    pub records_removed: u32,
    pub errors: Vec<String>,
}

pub struct PhotoCache;

impl PhotoCache {
    /// Replace the cached photos of a beach with `photos` (first five only)
    /// DOCUMENTATION: New bytes are uploaded and recorded before anything old is removed.
    /// If not a single photo could be cached the previous set is left untouched, since a
    /// stale photo is better than none. Old blobs are deleted only when no live record
    /// still points at their URL.
    ///
    /// # Returns
    /// Err only when the existing photo records cannot be read
    pub async fn replace_photo_set(
        deps: &PipelineDeps,
        beach_id: &str,
        photos: &[GooglePhoto],
        now: DateTime<Utc>,
    ) -> Result<PhotoSetOutcome, BeachError> {
        let previous = deps.directory.photos_for_beach(beach_id).await?;
        let fresh: Vec<&GooglePhoto> = photos.iter().take(MAX_PHOTOS_PER_BEACH).collect();
        let mut outcome = PhotoSetOutcome::default();
        let mut written: Vec<BeachPhoto> = Vec::with_capacity(fresh.len());

        for (position, photo) in fresh.iter().enumerate() {
            let photo_index = position as i32;
            let previous_url = previous
                .iter()
                .find(|p| p.photo_index == photo_index)
                .map(|p| p.storage_url.as_str());

            match Self::cache_photo(deps, beach_id, photo_index, photo, previous_url, now).await {
                Ok(record) => {
                    outcome.cached += 1;
                    written.push(record);
                }
                Err(e) => {
                    log::warn!("Skipping photo {} of {}: {}", photo_index, beach_id, e);
                    outcome.failed += 1;
                    outcome
                        .errors
                        .push(format!("{} photo {}: {}", beach_id, photo_index, e));
                }
            }

            deps.pacing.after_photo().await;
        }

        if written.is_empty() {
            if !previous.is_empty() {
                log::warn!(
                    "No fresh photos cached for {}; keeping {} existing",
                    beach_id,
                    previous.len()
                );
            }
            return Ok(outcome);
        }

        let rewritten: HashSet<i32> = written.iter().map(|p| p.photo_index).collect();
        let mut live_urls: HashSet<&str> =
            written.iter().map(|p| p.storage_url.as_str()).collect();
        live_urls.extend(
            previous
                .iter()
                .filter(|p| (p.photo_index as usize) < fresh.len())
                .filter(|p| !rewritten.contains(&p.photo_index))
                .map(|p| p.storage_url.as_str()),
        );

        for old in &previous {
            let in_range = (old.photo_index as usize) < fresh.len();

            if in_range && !rewritten.contains(&old.photo_index) {
                // Refresh of this slot failed; keep serving the old photo
                continue;
            }

            if !in_range {
                if let Err(e) = deps.directory.delete_photo(beach_id, old.photo_index).await {
                    log::warn!(
                        "Failed to drop photo record {}/{}: {}",
                        beach_id,
                        old.photo_index,
                        e
                    );
                    outcome.errors.push(e.to_string());
                    continue;
                }
                outcome.records_removed += 1;
            }

            if live_urls.contains(old.storage_url.as_str()) {
                continue;
            }

            match deps.blobs.delete(&old.storage_url).await {
                Ok(()) => outcome.blobs_deleted += 1,
                Err(e) => {
                    log::warn!("Failed to delete superseded blob {}: {}", old.storage_url, e);
                    outcome.errors.push(e.to_string());
                }
            }
        }

        log::debug!(
            "Photo set for {}: {} cached, {} failed, {} blobs deleted",
            beach_id,
            outcome.cached,
            outcome.failed,
            outcome.blobs_deleted
        );

        Ok(outcome)
    }

    /// Download one photo, upload it under its stable path and record it
    async fn cache_photo(
        deps: &PipelineDeps,
        beach_id: &str,
        photo_index: i32,
        photo: &GooglePhoto,
        previous_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<BeachPhoto, BeachError> {
        let media = deps
            .provider
            .fetch_photo_bytes(&photo.name, PHOTO_MAX_WIDTH_PX)
            .await?;

        let storage_url = deps
            .blobs
            .put(
                &photo_blob_path(beach_id, photo_index),
                media.bytes,
                &media.content_type,
            )
            .await?;

        let record = photo_record(beach_id, photo_index, photo, storage_url, now);

        if let Err(e) = deps.directory.upsert_photo(&record).await {
            if previous_url != Some(record.storage_url.as_str()) {
                if let Err(cleanup) = deps.blobs.delete(&record.storage_url).await {
                    log::warn!(
                        "Failed to remove unrecorded blob {}: {}",
                        record.storage_url,
                        cleanup
                    );
                }
            }
            return Err(e);
        }

        Ok(record)
    }
}

/// Photo record for a freshly uploaded blob
pub fn photo_record(
    beach_id: &str,
    photo_index: i32,
    photo: &GooglePhoto,
    storage_url: String,
    now: DateTime<Utc>,
) -> BeachPhoto {
    let author = photo.attribution();

    BeachPhoto {
        beach_id: beach_id.to_string(),
        photo_index,
        storage_url,
        attribution: Some(
            author
                .and_then(|a| a.display_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| FALLBACK_ATTRIBUTION.to_string()),
        ),
        attribution_url: author.and_then(|a| a.uri.clone()),
        width: photo.width_px,
        height: photo.height_px,
        cached_at: now,
        expires_at: photo_expiry(now),
    }
}
