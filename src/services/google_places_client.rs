// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API (New) client
// PURPOSE: Text search, photo/rating lookups and photo media downloads for the
// seed importer and the refresh jobs. Callers pace; the client never sleeps.

use crate::errors::BeachError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Field mask for text search
pub const SEARCH_FIELD_MASK: &str = concat!(
    "places.id,places.displayName,places.location,",
    "places.rating,places.userRatingCount,places.photos"
);

/// Field mask used when re-resolving photo references
pub const DETAILS_PHOTOS_FIELD_MASK: &str = "photos";

/// Field mask for the cheap rating check
pub const RATING_FIELD_MASK: &str = "rating,userRatingCount";

/// Search bias center (Cape Cod & Islands)
pub const BIAS_CENTER_LATITUDE: f64 = 41.67;
pub const BIAS_CENTER_LONGITUDE: f64 = -70.3;

/// The provider rejects circle biases larger than this
pub const MAX_BIAS_RADIUS_M: f64 = 50_000.0;

/// Photo width requested from the media endpoint
pub const PHOTO_MAX_WIDTH_PX: u32 = 1200;

const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Localized text wrapper (`displayName`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Author attribution that must accompany a displayed photo
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Photo reference from the provider
/// DOCUMENTATION: `name` is a short-lived resource name such as
/// `places/{id}/photos/{ref}`; it must be re-resolved before every download.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePhoto {
    pub name: String,
    #[serde(default)]
    pub width_px: Option<i32>,
    #[serde(default)]
    pub height_px: Option<i32>,
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
}

impl GooglePhoto {
    /// First author attribution, if any
    pub fn attribution(&self) -> Option<&AuthorAttribution> {
        self.author_attributions.first()
    }
}

/// Single text-search match
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePlace {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<i32>,
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
}

/// Details response restricted to the `photos` field
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
}

/// Details response restricted to `rating,userRatingCount`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRating {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, rename = "userRatingCount")]
    pub rating_count: Option<i32>,
}

/// Downloaded photo media
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoBytes {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
}

/// Operations the pipeline needs from a places provider
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// First match for a free-text query, `None` when nothing matched
    async fn search_place(&self, query: &str) -> Result<Option<GooglePlace>, BeachError>;

    /// Fresh photo references for a place
    async fn get_place_details(&self, place_id: &str) -> Result<PlaceDetails, BeachError>;

    /// Rating and rating count only
    async fn get_place_rating(&self, place_id: &str) -> Result<PlaceRating, BeachError>;

    async fn fetch_photo_bytes(
        &self,
        photo_name: &str,
        max_width_px: u32,
    ) -> Result<PhotoBytes, BeachError>;
}

/// Google Places API client
/// DOCUMENTATION: Authenticates with `X-Goog-Api-Key` on JSON calls and the `key`
/// query parameter on media downloads.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, BeachError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                BeachError::Configuration(format!("Failed to build places client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn with_auth(&self, builder: RequestBuilder, field_mask: &str) -> RequestBuilder {
        builder
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", field_mask)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, BeachError> {
        // Media URLs carry the API key in the query string
        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            log::error!("Places {} request failed: {}", what, e);
            BeachError::ProviderError(format!("{} request failed: {}", what, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Places {} error {}: {}", what, status, body);
            return Err(BeachError::ProviderError(format!(
                "{} failed with {}: {}",
                what, status, body
            )));
        }

        Ok(response)
    }

    async fn get_place_fields<T>(&self, place_id: &str, field_mask: &str) -> Result<T, BeachError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/places/{}", self.base_url, place_id);
        let request = self.with_auth(self.client.get(&url), field_mask);
        let response = self.send(request, "details").await?;

        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            log::error!("Failed to parse details for {}: {}", place_id, e);
            BeachError::ProviderError(format!("Parse error: {}", e))
        })
    }
}

/// Search request body
fn search_body(query: &str) -> serde_json::Value {
    serde_json::json!({
        "textQuery": query,
        "locationBias": {
            "circle": {
                "center": {
                    "latitude": BIAS_CENTER_LATITUDE,
                    "longitude": BIAS_CENTER_LONGITUDE
                },
                "radius": MAX_BIAS_RADIUS_M
            }
        }
    })
}

#[async_trait]
impl PlaceProvider for GooglePlacesClient {
    async fn search_place(&self, query: &str) -> Result<Option<GooglePlace>, BeachError> {
        let url = format!("{}/places:searchText", self.base_url);

        log::debug!("Places text search: {}", query);

        let request = self
            .with_auth(self.client.post(&url), SEARCH_FIELD_MASK)
            .json(&search_body(query));
        let response = self.send(request, "text search").await?;

        let body: SearchTextResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            log::error!("Failed to parse text search response: {}", e);
            BeachError::ProviderError(format!("Parse error: {}", e))
        })?;

        Ok(body.places.into_iter().next())
    }

    async fn get_place_details(&self, place_id: &str) -> Result<PlaceDetails, BeachError> {
        self.get_place_fields(place_id, DETAILS_PHOTOS_FIELD_MASK)
            .await
    }

    async fn get_place_rating(&self, place_id: &str) -> Result<PlaceRating, BeachError> {
        self.get_place_fields(place_id, RATING_FIELD_MASK).await
    }

    async fn fetch_photo_bytes(
        &self,
        photo_name: &str,
        max_width_px: u32,
    ) -> Result<PhotoBytes, BeachError> {
        let url = format!("{}/{}/media", self.base_url, photo_name);
        let request = self.client.get(&url).query(&[
            ("maxWidthPx", max_width_px.to_string()),
            ("key", self.api_key.clone()),
        ]);
        let response = self.send(request, "photo media").await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let bytes = response.bytes().await.map_err(|e| {
            BeachError::ProviderError(format!("Photo download failed: {}", e.without_url()))
        })?;

        Ok(PhotoBytes {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
