// src/models/rating.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Current aggregate review signal for a beach, one row per beach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BeachRating {
    pub beach_id: String,
    /// Provider may return no score at all
    pub rating: Option<f64>,
    pub rating_count: i32,
    pub refreshed_at: DateTime<Utc>,
}

impl BeachRating {
    pub fn new(
        beach_id: &str,
        rating: Option<f64>,
        rating_count: Option<i32>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            beach_id: beach_id.to_string(),
            rating,
            rating_count: rating_count.unwrap_or(0),
            refreshed_at: now,
        }
    }
}
