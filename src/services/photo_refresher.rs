// src/services/photo_refresher.rs
// DOCUMENTATION: Photo refresh job
// PURPOSE: Replace cached photos that are expired or about to expire with freshly
// downloaded ones, re-resolving photo references through place details first

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::BeachError;
use crate::models::{refresh_cutoff, BeachPhoto};
use crate::services::{PhotoCache, PipelineDeps};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoRefreshStats {
    /// Beaches with at least one expiring photo
    pub candidates: u32,
    pub refreshed: u32,
    pub failed: u32,
    pub photos_cached: u32,
    pub blobs_deleted: u32,
    pub errors: Vec<String>,
}

impl PhotoRefreshStats {
    pub fn message(&self) -> String {
        if self.candidates == 0 {
            "No photos need refresh".to_string()
        } else {
            format!(
                "Photos refreshed for {}/{} beaches",
                self.refreshed, self.candidates
            )
        }
    }
}

pub struct PhotoRefresher;

impl PhotoRefresher {
    /// Refresh photos expiring before `now` + 3 days
    /// DOCUMENTATION: Beaches are processed one at a time in the order their first
    /// expiring photo was listed. A beach counts as refreshed when at least one new
    /// photo was cached; otherwise its old photos stay in place and keep being served.
    pub async fn refresh_photos(
        deps: &PipelineDeps,
        now: DateTime<Utc>,
    ) -> Result<PhotoRefreshStats, BeachError> {
        let cutoff = refresh_cutoff(now);
        let expiring = deps
            .directory
            .list_photos_expiring_before(cutoff)
            .await
            .map_err(|e| {
                log::error!("Photo refresh aborted, cannot list expiring photos: {}", e);
                e
            })?;

        let beach_ids = candidate_beach_ids(&expiring);
        let mut stats = PhotoRefreshStats {
            candidates: beach_ids.len() as u32,
            ..Default::default()
        };

        if beach_ids.is_empty() {
            log::info!("No photos expiring before {}", cutoff.to_rfc3339());
            return Ok(stats);
        }

        log::info!(
            "{} photos on {} beaches expire before {}",
            expiring.len(),
            beach_ids.len(),
            cutoff.to_rfc3339()
        );

        for beach_id in &beach_ids {
            match Self::refresh_one(deps, beach_id, now, &mut stats).await {
                Ok(true) => stats.refreshed += 1,
                Ok(false) => {
                    stats.failed += 1;
                    stats
                        .errors
                        .push(format!("{}: no fresh photos cached", beach_id));
                }
                Err(e) => {
                    log::warn!("Photo refresh failed for {}: {}", beach_id, e);
                    stats.failed += 1;
                    stats.errors.push(format!("{}: {}", beach_id, e));
                }
            }

            deps.pacing.after_place().await;
        }

        log::info!("{}", stats.message());
        Ok(stats)
    }

    async fn refresh_one(
        deps: &PipelineDeps,
        beach_id: &str,
        now: DateTime<Utc>,
        stats: &mut PhotoRefreshStats,
    ) -> Result<bool, BeachError> {
        let details = deps.provider.get_place_details(beach_id).await?;

        if details.photos.is_empty() {
            log::warn!("Provider returned no photos for {}", beach_id);
            return Ok(false);
        }

        let outcome = PhotoCache::replace_photo_set(deps, beach_id, &details.photos, now).await?;

        stats.photos_cached += outcome.cached;
        stats.blobs_deleted += outcome.blobs_deleted;
        stats.errors.extend(outcome.errors);

        Ok(outcome.cached > 0)
    }
}

/// Distinct beach ids in first-seen order
pub fn candidate_beach_ids(photos: &[BeachPhoto]) -> Vec<String> {
    let mut seen = HashSet::new();
    photos
        .iter()
        .filter(|p| seen.insert(p.beach_id.as_str()))
        .map(|p| p.beach_id.clone())
        .collect()
}
