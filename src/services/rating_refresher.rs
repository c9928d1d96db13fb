// src/services/rating_refresher.rs
// DOCUMENTATION: Rating refresh job
// PURPOSE: Re-read rating and rating count for every active beach with the narrow
// field mask and overwrite the stored values

use chrono::Utc;
use serde::Serialize;

use crate::errors::BeachError;
use crate::models::BeachRating;
use crate::services::PipelineDeps;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingRefreshStats {
    pub total: u32,
    pub updated: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

impl RatingRefreshStats {
    pub fn message(&self) -> String {
        format!(
            "Ratings refreshed: {} updated, {} failed",
            self.updated, self.failed
        )
    }
}

pub struct RatingRefresher;

impl RatingRefresher {
    /// Refresh ratings for all active beaches
    /// DOCUMENTATION: One provider call per beach, paced; a failing beach is logged and
    /// skipped. Only a failure to list the beaches aborts the run.
    pub async fn refresh_ratings(deps: &PipelineDeps) -> Result<RatingRefreshStats, BeachError> {
        let beaches = deps.directory.list_active_beaches().await.map_err(|e| {
            log::error!("Rating refresh aborted, cannot list beaches: {}", e);
            e
        })?;

        let mut stats = RatingRefreshStats {
            total: beaches.len() as u32,
            ..Default::default()
        };

        log::info!("Refreshing ratings for {} beaches", beaches.len());

        for beach in &beaches {
            match Self::refresh_one(deps, &beach.id).await {
                Ok(()) => stats.updated += 1,
                Err(e) => {
                    log::warn!("Rating refresh failed for {} ({}): {}", beach.name, beach.id, e);
                    stats.failed += 1;
                    stats.errors.push(format!("{}: {}", beach.id, e));
                }
            }

            deps.pacing.after_place().await;
        }

        log::info!("{}", stats.message());
        Ok(stats)
    }

    async fn refresh_one(deps: &PipelineDeps, beach_id: &str) -> Result<(), BeachError> {
        let fetched = deps.provider.get_place_rating(beach_id).await?;
        let rating = BeachRating::new(beach_id, fetched.rating, fetched.rating_count, Utc::now());
        deps.directory.upsert_rating(&rating).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Pacing;
    use crate::testing::{FakeProvider, MemoryBlobStore, MemoryDirectory};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_refreshes_with_rating_lookup_only() {
        let provider = Arc::new(
            FakeProvider::default()
                .with_rating("P1", Some(4.7), Some(210))
                .with_rating("P2", None, None),
        );
        let directory = Arc::new(MemoryDirectory::default());
        directory.insert_beach("P1", "Old Silver Beach");
        directory.insert_beach("P2", "Chapoquoit Beach");
        directory.insert_beach("P3", "Gone Beach");

        let deps = PipelineDeps::new(
            provider.clone(),
            Arc::new(MemoryBlobStore::default()),
            directory.clone(),
            Pacing::none(),
        );

        let stats = assert_ok!(RatingRefresher::refresh_ratings(&deps).await);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.updated, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.message(), "Ratings refreshed: 2 updated, 1 failed");
        assert_eq!(
            provider.calls(),
            vec!["rating:P1", "rating:P2", "rating:P3"]
        );

        let ratings = directory.ratings();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].rating, Some(4.7));
        assert_eq!(ratings[0].rating_count, 210);
        assert_eq!(ratings[1].rating, None);
        assert_eq!(ratings[1].rating_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_is_still_paced() {
        let provider = Arc::new(FakeProvider::default().with_rating("P1", Some(4.2), Some(9)));
        let directory = Arc::new(MemoryDirectory::default());
        directory.insert_beach("P1", "Old Silver Beach");
        directory.insert_beach("P2", "Gone Beach");

        let deps = PipelineDeps::new(
            provider,
            Arc::new(MemoryBlobStore::default()),
            directory,
            Pacing::default(),
        );
        let started = tokio::time::Instant::now();

        let stats = assert_ok!(RatingRefresher::refresh_ratings(&deps).await);

        let elapsed = started.elapsed();
        assert_eq!(stats.failed, 1);
        assert!(elapsed >= Duration::from_millis(3000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(3010), "{:?}", elapsed);
    }
}
