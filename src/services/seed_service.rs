// src/services/seed_service.rs
// DOCUMENTATION: Seed importer
// PURPOSE: Resolve curated beach descriptors against the Places provider and populate
// the directory, ratings and photo cache

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::errors::BeachError;
use crate::models::{BeachRating, BeachRecord, BeachSeed};
use crate::services::{GooglePlace, PhotoCache, PipelineDeps};

/// Seed run statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedStats {
    /// Descriptors processed
    pub total: u32,
    /// Descriptors resolved and written
    pub succeeded: u32,
    /// Descriptors that were invalid, unmatched or could not be written
    pub failed: u32,
    /// Photos uploaded across all beaches
    pub photos_cached: u32,
    pub errors: Vec<String>,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl SeedStats {
    pub fn new(total: usize) -> Self {
        Self {
            total: total as u32,
            succeeded: 0,
            failed: 0,
            photos_cached: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }

    fn fail(&mut self, message: String) {
        log::warn!("{}", message);
        self.failed += 1;
        self.errors.push(message);
    }
}

pub struct SeedService;

impl SeedService {
    /// Import every descriptor, strictly one after another
    /// DOCUMENTATION: Per descriptor:
    /// 1. Validate it (invalid → failure, provider never called)
    /// 2. Text-search the provider (no match or error → failure)
    /// 3. Upsert the beach (failure → no rating, no photos)
    /// 4. Upsert the rating stamped now
    /// 5. Cache up to five photos from the search result
    ///
    /// Re-running with the same descriptors converges on the same rows.
    pub async fn seed_beaches(deps: &PipelineDeps, seeds: &[BeachSeed]) -> SeedStats {
        let start_time = Instant::now();
        let mut stats = SeedStats::new(seeds.len());

        log::info!("Seeding {} beaches", seeds.len());

        for (idx, seed) in seeds.iter().enumerate() {
            log::info!(
                "[{}/{}] Resolving \"{}\"",
                idx + 1,
                seeds.len(),
                seed.search_query
            );

            if let Err(e) = seed.validate() {
                stats.fail(format!("Invalid descriptor \"{}\": {}", seed.search_query, e));
                continue;
            }

            match Self::seed_one(deps, seed, &mut stats).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => stats.fail(format!("\"{}\": {}", seed.search_query, e)),
            }

            deps.pacing.after_place().await;
        }

        stats.complete(start_time.elapsed().as_secs());

        log::info!(
            "Seed completed: {} succeeded, {} failed, {} photos cached in {}s",
            stats.succeeded,
            stats.failed,
            stats.photos_cached,
            stats.duration_seconds
        );

        stats
    }

    async fn seed_one(
        deps: &PipelineDeps,
        seed: &BeachSeed,
        stats: &mut SeedStats,
    ) -> Result<(), BeachError> {
        let place = deps
            .provider
            .search_place(&seed.search_query)
            .await?
            .ok_or_else(|| BeachError::NotFound("no place match".into()))?;

        let record = beach_record(seed, &place);
        deps.directory.upsert_beach(&record).await?;

        let now = Utc::now();
        let rating = BeachRating::new(&place.id, place.rating, place.user_rating_count, now);
        if let Err(e) = deps.directory.upsert_rating(&rating).await {
            log::warn!("Rating write failed for {}: {}", place.id, e);
            stats.errors.push(format!("{} rating: {}", place.id, e));
        }

        match PhotoCache::replace_photo_set(deps, &place.id, &place.photos, now).await {
            Ok(outcome) => {
                stats.photos_cached += outcome.cached;
                stats.errors.extend(outcome.errors);
            }
            Err(e) => {
                log::warn!("Photo caching failed for {}: {}", place.id, e);
                stats.errors.push(format!("{} photos: {}", place.id, e));
            }
        }

        log::info!(
            "Seeded {} ({}) rating={:?}",
            record.name,
            record.id,
            place.rating
        );

        Ok(())
    }
}

/// Directory row for a descriptor and its provider match
/// DOCUMENTATION: The provider's display name wins over the query; coordinates come
/// from the provider and fall back to the descriptor's own.
pub fn beach_record(seed: &BeachSeed, place: &GooglePlace) -> BeachRecord {
    let name = place
        .display_name
        .as_ref()
        .map(|n| n.text.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| seed.search_query.clone());

    let (lat, lng) = match &place.location {
        Some(location) => (Some(location.latitude), Some(location.longitude)),
        None => (seed.latitude, seed.longitude),
    };

    BeachRecord {
        id: place.id.clone(),
        name,
        town: seed.town.clone(),
        region: seed.region,
        island: seed.island,
        lat,
        lng,
        beach_type: seed.beach_type,
        best_for: seed.best_for.clone(),
        access_type: seed.access_type.clone(),
        parking_info: seed.parking_info.clone(),
        description: seed.description.clone(),
        attributes: seed.attributes.clone(),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BeachAttributes, BeachType, Island, Region};
    use crate::services::Pacing;
    use crate::testing::{google_place, FakeProvider, MemoryBlobStore, MemoryDirectory};
    use std::sync::Arc;
    use std::time::Duration;

    fn seed(query: &str) -> BeachSeed {
        BeachSeed {
            search_query: query.to_string(),
            town: "Falmouth".into(),
            region: Region::UpperCape,
            island: Island::CapeCod,
            beach_type: BeachType::BayCalm,
            best_for: vec!["families".into()],
            access_type: "public".into(),
            parking_info: Some("Large lot".into()),
            description: None,
            latitude: Some(41.0),
            longitude: Some(-70.0),
            attributes: BeachAttributes {
                restrooms: Some(true),
                ..Default::default()
            },
        }
    }

    fn deps(
        provider: &Arc<FakeProvider>,
        blobs: &Arc<MemoryBlobStore>,
        directory: &Arc<MemoryDirectory>,
    ) -> PipelineDeps {
        PipelineDeps::new(
            provider.clone(),
            blobs.clone(),
            directory.clone(),
            Pacing::none(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_seed() {
        let provider = Arc::new(
            FakeProvider::default().with_place(
                "Old Silver Beach Falmouth MA",
                google_place(
                    "P1",
                    "Old Silver Beach",
                    Some(4.5),
                    &["places/P1/photos/a", "places/P1/photos/b"],
                ),
            ),
        );
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());

        let stats = SeedService::seed_beaches(
            &deps(&provider, &blobs, &directory),
            &[seed("Old Silver Beach Falmouth MA"), seed("Nonexistent Beach")],
        )
        .await;

        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.photos_cached, 2);

        let beaches = directory.beaches();
        assert_eq!(beaches.len(), 1);
        assert_eq!(beaches[0].id, "P1");
        assert!(beaches[0].is_active);

        let ratings = directory.ratings();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating, Some(4.5));

        let photos = directory.photos_of("P1");
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].photo_index, 0);
        assert_eq!(photos[1].photo_index, 1);
        assert_ne!(photos[0].storage_url, photos[1].storage_url);
        assert_eq!(photos[0].storage_url, "https://blob.test/beaches/P1/photo-0.jpg");
    }

    #[tokio::test(start_paused = true)]
    async fn test_paces_after_every_place_and_photo() {
        let provider = Arc::new(FakeProvider::default().with_place(
            "Old Silver Beach Falmouth MA",
            google_place(
                "P1",
                "Old Silver Beach",
                Some(4.5),
                &["places/P1/photos/a", "places/P1/photos/b"],
            ),
        ));
        let paced = PipelineDeps::new(
            provider,
            Arc::new(MemoryBlobStore::default()),
            Arc::new(MemoryDirectory::default()),
            Pacing::default(),
        );
        let started = tokio::time::Instant::now();

        let stats = SeedService::seed_beaches(
            &paced,
            &[seed("Nonexistent Beach"), seed("Old Silver Beach Falmouth MA")],
        )
        .await;

        // Two places at 1.5 s, two photos at 0.5 s; the unmatched place is paced too
        let elapsed = started.elapsed();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.photos_cached, 2);
        assert!(elapsed >= Duration::from_millis(4000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(4010), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn test_reseeding_is_idempotent() {
        let provider = Arc::new(FakeProvider::default().with_place(
            "Old Silver Beach Falmouth MA",
            google_place("P1", "Old Silver Beach", Some(4.5), &["places/P1/photos/a"]),
        ));
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());
        let deps = deps(&provider, &blobs, &directory);
        let seeds = [seed("Old Silver Beach Falmouth MA")];

        SeedService::seed_beaches(&deps, &seeds).await;
        let first_beaches: Vec<_> = directory.beaches().into_iter().map(|b| b.name).collect();
        let first_photos: Vec<_> = directory
            .photos()
            .into_iter()
            .map(|p| (p.photo_index, p.storage_url))
            .collect();

        let stats = SeedService::seed_beaches(&deps, &seeds).await;

        assert_eq!(stats.succeeded, 1);
        assert_eq!(
            directory.beaches().into_iter().map(|b| b.name).collect::<Vec<_>>(),
            first_beaches
        );
        assert_eq!(directory.ratings().len(), 1);
        assert_eq!(
            directory
                .photos()
                .into_iter()
                .map(|p| (p.photo_index, p.storage_url))
                .collect::<Vec<_>>(),
            first_photos
        );
        assert_eq!(blobs.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_descriptor() {
        let provider = Arc::new(
            FakeProvider::default()
                .with_place("A", google_place("PA", "Beach A", None, &[]))
                .with_search_error("C"),
        );
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());

        let stats = SeedService::seed_beaches(
            &deps(&provider, &blobs, &directory),
            &[seed("A"), seed("B"), seed("C")],
        )
        .await;

        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(
            provider.calls(),
            vec!["search:A", "search:B", "search:C"]
        );
        assert_eq!(directory.ratings()[0].rating_count, 0);
    }

    #[tokio::test]
    async fn test_failed_beach_write_skips_rating_and_photos() {
        let provider = Arc::new(FakeProvider::default().with_place(
            "A",
            google_place("PA", "Beach A", Some(4.0), &["places/PA/photos/a"]),
        ));
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());
        directory.fail_beach_writes_for("PA");

        let stats = SeedService::seed_beaches(&deps(&provider, &blobs, &directory), &[seed("A")])
            .await;

        assert_eq!(stats.failed, 1);
        assert!(directory.ratings().is_empty());
        assert!(directory.photos().is_empty());
        assert!(!provider.calls().iter().any(|c| c.starts_with("photo:")));
    }

    #[tokio::test]
    async fn test_invalid_descriptor_never_reaches_provider() {
        let provider = Arc::new(FakeProvider::default());
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());
        let mut invalid = seed("Somewhere");
        invalid.access_type = String::new();

        let stats =
            SeedService::seed_beaches(&deps(&provider, &blobs, &directory), &[invalid]).await;

        assert_eq!(stats.failed, 1);
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_beach_record_falls_back_to_query_and_seed_coordinates() {
        let mut place = google_place("P9", "", None, &[]);
        place.location = None;

        let record = beach_record(&seed("Mystery Beach Truro MA"), &place);

        assert_eq!(record.name, "Mystery Beach Truro MA");
        assert_eq!(record.lat, Some(41.0));
        assert_eq!(record.lng, Some(-70.0));
        assert!(record.is_active);
        assert_eq!(record.attributes.restrooms, Some(true));
    }

    #[tokio::test]
    async fn test_reseed_keeps_previously_enriched_attributes() {
        let provider = Arc::new(FakeProvider::default().with_place(
            "A",
            google_place("PA", "Beach A", Some(4.0), &[]),
        ));
        let blobs = Arc::new(MemoryBlobStore::default());
        let directory = Arc::new(MemoryDirectory::default());
        let deps = deps(&provider, &blobs, &directory);

        let mut enriched = seed("A");
        enriched.attributes.sunset_view = Some(true);
        SeedService::seed_beaches(&deps, &[enriched]).await;
        SeedService::seed_beaches(&deps, &[seed("A")]).await;

        let beach = directory.beach("PA").unwrap();
        assert_eq!(beach.attributes.0.sunset_view, Some(true));
        assert_eq!(beach.attributes.0.restrooms, Some(true));
    }
}
