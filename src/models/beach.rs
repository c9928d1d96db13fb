// src/models/beach.rs
// DOCUMENTATION: Core data structures for beaches
// PURPOSE: Directory records, closed-set classifications, and API response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::{BeachPhoto, BeachRating};

/// Geographic grouping used by the directory filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    UpperCape,
    MidCape,
    LowerCape,
    OuterCape,
    Nantucket,
    MarthasVineyard,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UpperCape => "upper_cape",
            Region::MidCape => "mid_cape",
            Region::LowerCape => "lower_cape",
            Region::OuterCape => "outer_cape",
            Region::Nantucket => "nantucket",
            Region::MarthasVineyard => "marthas_vineyard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Island {
    CapeCod,
    MarthasVineyard,
    Nantucket,
}

impl Island {
    pub fn as_str(&self) -> &'static str {
        match self {
            Island::CapeCod => "cape_cod",
            Island::MarthasVineyard => "marthas_vineyard",
            Island::Nantucket => "nantucket",
        }
    }
}

/// Beach classification (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeachType {
    OceanSurf,
    BayCalm,
    Sound,
    Dunes,
    NationalSeashore,
    Harbor,
}

impl BeachType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeachType::OceanSurf => "ocean_surf",
            BeachType::BayCalm => "bay_calm",
            BeachType::Sound => "sound",
            BeachType::Dunes => "dunes",
            BeachType::NationalSeashore => "national_seashore",
            BeachType::Harbor => "harbor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifeguards {
    pub available: bool,
    pub season: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogPolicy {
    pub allowed: bool,
    pub details: String,
}

/// Optional extended attributes
/// DOCUMENTATION: Stored in the `attributes` JSONB column. Absent fields are never
/// serialized, so an upsert only touches the keys the descriptor actually carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeachAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_body: Option<String>,
    /// Range string, e.g. "68-72"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_summer_water_temp_f: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tidal_variation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shark_risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jellyfish_risk: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifeguards: Option<Lifeguards>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrooms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changing_rooms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_nearby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_rack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volleyball_court: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_policy: Option<DogPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_parking_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_sticker_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_resident_seasonal_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_enforcement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowd_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beach_length_miles: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sand_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade_available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset_view: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town_beach_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

macro_rules! overlay_fields {
    ($target:expr, $source:expr, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field.clone();
            }
        )+
    };
}

impl BeachAttributes {
    /// Overlay the fields present in `other`, keeping every field it omits.
    /// Mirrors `attributes || EXCLUDED.attributes` in the beach upsert.
    pub fn merge(&mut self, other: &BeachAttributes) {
        overlay_fields!(
            self,
            other,
            address,
            google_maps_url,
            water_body,
            avg_summer_water_temp_f,
            wave_intensity,
            tidal_variation,
            shark_risk,
            jellyfish_risk,
            lifeguards,
            restrooms,
            showers,
            changing_rooms,
            food_nearby,
            wheelchair_accessible,
            bike_rack,
            volleyball_court,
            dog_policy,
            daily_parking_fee,
            resident_sticker_cost,
            non_resident_seasonal_cost,
            parking_capacity,
            parking_enforcement,
            crowd_level,
            best_arrival_time,
            beach_length_miles,
            sand_type,
            shade_available,
            sunset_view,
            town_beach_url,
            phone,
        );
    }
}

/// Write model for the beaches table
/// DOCUMENTATION: Built by the seed importer from a descriptor plus the provider match.
/// `id` is the provider's place identifier and never changes once assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeachRecord {
    pub id: String,
    pub name: String,
    pub town: String,
    pub region: Region,
    pub island: Island,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub beach_type: BeachType,
    pub best_for: Vec<String>,
    pub access_type: String,
    pub parking_info: Option<String>,
    pub description: Option<String>,
    pub attributes: BeachAttributes,
    pub is_active: bool,
}

/// Stored beach row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Beach {
    pub id: String,
    pub name: String,
    pub town: String,
    pub region: String,
    pub island: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub beach_type: String,
    pub best_for: Vec<String>,
    pub access_type: String,
    pub parking_info: Option<String>,
    pub description: Option<String>,
    pub attributes: Json<BeachAttributes>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: beach joined with its rating and first photo
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BeachDirectoryEntry {
    pub id: String,
    pub name: String,
    pub town: String,
    pub region: String,
    pub island: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub beach_type: String,
    pub best_for: Vec<String>,
    pub access_type: String,
    pub parking_info: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub primary_photo_url: Option<String>,
    pub primary_photo_attribution: Option<String>,
}

/// GET /api/beaches/{id} response
#[derive(Debug, Serialize)]
pub struct BeachDetailResponse {
    #[serde(flatten)]
    pub beach: Beach,
    pub rating: Option<BeachRating>,
    pub photos: Vec<BeachPhoto>,
}

/// Directory listing filters
/// DOCUMENTATION: Query string for GET /api/beaches; every filter is optional
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub island: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub beach_type: Option<String>,
    #[serde(rename = "bestFor")]
    pub best_for: Option<String>,
    /// Free-text match on name or town
    pub q: Option<String>,
}
