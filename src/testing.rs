// src/testing.rs
// DOCUMENTATION: In-memory stand-ins for the provider, blob store and directory
// PURPOSE: Drive the seed importer and refresh jobs in unit tests without network or Postgres

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::db::DirectoryStore;
use crate::errors::BeachError;
use crate::models::{Beach, BeachPhoto, BeachRating, BeachRecord};
use crate::services::{
    AuthorAttribution, GooglePhoto, GooglePlace, LatLng, LocalizedText, PhotoBytes,
    PlaceDetails, PlaceProvider, PlaceRating,
};

pub fn google_photo(name: &str) -> GooglePhoto {
    GooglePhoto {
        name: name.to_string(),
        width_px: Some(1600),
        height_px: Some(1200),
        author_attributions: vec![AuthorAttribution {
            display_name: Some("Test Author".into()),
            uri: Some("https://maps.google.com/contrib/1".into()),
        }],
    }
}

pub fn google_place(id: &str, name: &str, rating: Option<f64>, photos: &[&str]) -> GooglePlace {
    GooglePlace {
        id: id.to_string(),
        display_name: Some(LocalizedText {
            text: name.to_string(),
        }),
        location: Some(LatLng {
            latitude: 41.55,
            longitude: -70.61,
        }),
        rating,
        user_rating_count: rating.map(|_| 100),
        photos: photos.iter().map(|p| google_photo(p)).collect(),
    }
}

/// Scripted places provider that records every call it receives
#[derive(Default)]
pub struct FakeProvider {
    places: HashMap<String, GooglePlace>,
    search_errors: HashSet<String>,
    details: HashMap<String, Vec<GooglePhoto>>,
    ratings: HashMap<String, PlaceRating>,
    failing_photos: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_place(mut self, query: &str, place: GooglePlace) -> Self {
        self.places.insert(query.to_string(), place);
        self
    }

    pub fn with_search_error(mut self, query: &str) -> Self {
        self.search_errors.insert(query.to_string());
        self
    }

    pub fn with_details(mut self, place_id: &str, photos: &[&str]) -> Self {
        self.details.insert(
            place_id.to_string(),
            photos.iter().map(|p| google_photo(p)).collect(),
        );
        self
    }

    pub fn with_rating(mut self, place_id: &str, rating: Option<f64>, count: Option<i32>) -> Self {
        self.ratings.insert(
            place_id.to_string(),
            PlaceRating {
                rating,
                rating_count: count,
            },
        );
        self
    }

    pub fn with_failing_photo(mut self, name: &str) -> Self {
        self.failing_photos.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlaceProvider for FakeProvider {
    async fn search_place(&self, query: &str) -> Result<Option<GooglePlace>, BeachError> {
        self.record(format!("search:{}", query));
        if self.search_errors.contains(query) {
            return Err(BeachError::ProviderError(format!("search failed: {}", query)));
        }
        Ok(self.places.get(query).cloned())
    }

    async fn get_place_details(&self, place_id: &str) -> Result<PlaceDetails, BeachError> {
        self.record(format!("details:{}", place_id));
        self.details
            .get(place_id)
            .map(|photos| PlaceDetails {
                photos: photos.clone(),
            })
            .ok_or_else(|| BeachError::ProviderError(format!("no details for {}", place_id)))
    }

    async fn get_place_rating(&self, place_id: &str) -> Result<PlaceRating, BeachError> {
        self.record(format!("rating:{}", place_id));
        self.ratings
            .get(place_id)
            .cloned()
            .ok_or_else(|| BeachError::ProviderError(format!("no rating for {}", place_id)))
    }

    async fn fetch_photo_bytes(
        &self,
        photo_name: &str,
        _max_width_px: u32,
    ) -> Result<PhotoBytes, BeachError> {
        self.record(format!("photo:{}", photo_name));
        if self.failing_photos.contains(photo_name) {
            return Err(BeachError::ProviderError(format!("media failed: {}", photo_name)));
        }
        Ok(PhotoBytes {
            bytes: photo_name.as_bytes().to_vec(),
            content_type: "image/jpeg".into(),
        })
    }
}

/// Blob store keyed by URL
/// DOCUMENTATION: By default a path always maps to the same URL (overwrite in place).
/// `versioned()` hands out a new URL per upload, like stores that version objects.
#[derive(Default)]
pub struct MemoryBlobStore {
    versioned: bool,
    version: AtomicU32,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
}

impl MemoryBlobStore {
    pub fn versioned() -> Self {
        Self {
            versioned: true,
            ..Default::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.objects.lock().unwrap().contains_key(url)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl crate::services::BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BeachError> {
        let url = if self.versioned {
            let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
            format!("https://blob.test/{}?v={}", path, version)
        } else {
            format!("https://blob.test/{}", path)
        };
        self.objects.lock().unwrap().insert(url.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), BeachError> {
        self.objects.lock().unwrap().remove(url);
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Directory store with the same upsert semantics as the Postgres tables
#[derive(Default)]
pub struct MemoryDirectory {
    beaches: Mutex<BTreeMap<String, Beach>>,
    ratings: Mutex<BTreeMap<String, BeachRating>>,
    photos: Mutex<BTreeMap<(String, i32), BeachPhoto>>,
    failing_beaches: Mutex<HashSet<String>>,
    failing_photo_beaches: Mutex<HashSet<String>>,
}

impl MemoryDirectory {
    pub fn fail_beach_writes_for(&self, beach_id: &str) {
        self.failing_beaches
            .lock()
            .unwrap()
            .insert(beach_id.to_string());
    }

    pub fn fail_photo_writes_for(&self, beach_id: &str) {
        self.failing_photo_beaches
            .lock()
            .unwrap()
            .insert(beach_id.to_string());
    }

    pub fn beaches(&self) -> Vec<Beach> {
        self.beaches.lock().unwrap().values().cloned().collect()
    }

    pub fn beach(&self, beach_id: &str) -> Option<Beach> {
        self.beaches.lock().unwrap().get(beach_id).cloned()
    }

    pub fn ratings(&self) -> Vec<BeachRating> {
        self.ratings.lock().unwrap().values().cloned().collect()
    }

    pub fn photos(&self) -> Vec<BeachPhoto> {
        self.photos.lock().unwrap().values().cloned().collect()
    }

    pub fn photos_of(&self, beach_id: &str) -> Vec<BeachPhoto> {
        self.photos()
            .into_iter()
            .filter(|p| p.beach_id == beach_id)
            .collect()
    }

    /// Place a photo record directly, bypassing the pipeline
    pub fn insert_photo(&self, photo: BeachPhoto) {
        self.photos
            .lock()
            .unwrap()
            .insert((photo.beach_id.clone(), photo.photo_index), photo);
    }

    /// Place an active beach directly, bypassing the pipeline
    pub fn insert_beach(&self, beach_id: &str, name: &str) {
        let now = Utc::now();
        self.beaches.lock().unwrap().insert(
            beach_id.to_string(),
            Beach {
                id: beach_id.to_string(),
                name: name.to_string(),
                town: "Falmouth".into(),
                region: "upper_cape".into(),
                island: "cape_cod".into(),
                lat: None,
                lng: None,
                beach_type: "bay_calm".into(),
                best_for: Vec::new(),
                access_type: "public".into(),
                parking_info: None,
                description: None,
                attributes: Json(Default::default()),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        );
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn upsert_beach(&self, record: &BeachRecord) -> Result<(), BeachError> {
        if self.failing_beaches.lock().unwrap().contains(&record.id) {
            return Err(BeachError::DatabaseError(format!(
                "Upsert beach {} failed",
                record.id
            )));
        }

        let now = Utc::now();
        let mut beaches = self.beaches.lock().unwrap();
        let merged = match beaches.get(&record.id) {
            Some(existing) => {
                let mut attributes = existing.attributes.0.clone();
                attributes.merge(&record.attributes);
                Beach {
                    lat: record.lat.or(existing.lat),
                    lng: record.lng.or(existing.lng),
                    parking_info: record
                        .parking_info
                        .clone()
                        .or_else(|| existing.parking_info.clone()),
                    description: record
                        .description
                        .clone()
                        .or_else(|| existing.description.clone()),
                    attributes: Json(attributes),
                    created_at: existing.created_at,
                    ..beach_row(record, now)
                }
            }
            None => beach_row(record, now),
        };
        beaches.insert(record.id.clone(), merged);
        Ok(())
    }

    async fn upsert_rating(&self, rating: &BeachRating) -> Result<(), BeachError> {
        self.ratings
            .lock()
            .unwrap()
            .insert(rating.beach_id.clone(), rating.clone());
        Ok(())
    }

    async fn upsert_photo(&self, photo: &BeachPhoto) -> Result<(), BeachError> {
        if self
            .failing_photo_beaches
            .lock()
            .unwrap()
            .contains(&photo.beach_id)
        {
            return Err(BeachError::DatabaseError(format!(
                "Upsert photo {}/{} failed",
                photo.beach_id, photo.photo_index
            )));
        }
        self.insert_photo(photo.clone());
        Ok(())
    }

    async fn list_active_beaches(&self) -> Result<Vec<Beach>, BeachError> {
        Ok(self.beaches().into_iter().filter(|b| b.is_active).collect())
    }

    async fn list_photos_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BeachPhoto>, BeachError> {
        Ok(self
            .photos()
            .into_iter()
            .filter(|p| p.expires_before(cutoff))
            .collect())
    }

    async fn photos_for_beach(&self, beach_id: &str) -> Result<Vec<BeachPhoto>, BeachError> {
        Ok(self.photos_of(beach_id))
    }

    async fn delete_photo(&self, beach_id: &str, photo_index: i32) -> Result<(), BeachError> {
        self.photos
            .lock()
            .unwrap()
            .remove(&(beach_id.to_string(), photo_index));
        Ok(())
    }
}

fn beach_row(record: &BeachRecord, now: DateTime<Utc>) -> Beach {
    Beach {
        id: record.id.clone(),
        name: record.name.clone(),
        town: record.town.clone(),
        region: record.region.as_str().to_string(),
        island: record.island.as_str().to_string(),
        lat: record.lat,
        lng: record.lng,
        beach_type: record.beach_type.as_str().to_string(),
        best_for: record.best_for.clone(),
        access_type: record.access_type.clone(),
        parking_info: record.parking_info.clone(),
        description: record.description.clone(),
        attributes: Json(record.attributes.clone()),
        is_active: record.is_active,
        created_at: now,
        updated_at: now,
    }
}
