// src/models/seed.rs
// DOCUMENTATION: Hand-curated beach descriptors consumed by the seed importer
// PURPOSE: Input format for the seed data file (JSON, snake_case keys)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{BeachAttributes, BeachType, Island, Region};

/// One curated beach, resolved against the Places provider at seed time
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BeachSeed {
    /// Text sent to the provider's text search (name + town + state)
    #[validate(length(min = 1, max = 255))]
    pub search_query: String,

    #[validate(length(min = 1, max = 120))]
    pub town: String,

    pub region: Region,

    pub island: Island,

    pub beach_type: BeachType,

    #[serde(default)]
    pub best_for: Vec<String>,

    #[validate(length(min = 1, max = 64))]
    pub access_type: String,

    #[serde(default)]
    pub parking_info: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Used only when the provider match carries no location
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(flatten)]
    pub attributes: BeachAttributes,
}
