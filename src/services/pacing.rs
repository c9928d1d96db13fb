// src/services/pacing.rs
// DOCUMENTATION: Fixed delays between provider calls
// PURPOSE: Keep the jobs under the provider's rate limits; delays apply after every
// call whether it succeeded or not

use crate::config::Config;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Pause after each place
    pub place_delay: Duration,
    /// Pause after each photo download
    pub photo_delay: Duration,
}

impl Pacing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            place_delay: Duration::from_millis(config.place_delay_ms),
            photo_delay: Duration::from_millis(config.photo_delay_ms),
        }
    }

    /// No pauses at all (tests and dry runs)
    pub fn none() -> Self {
        Self {
            place_delay: Duration::ZERO,
            photo_delay: Duration::ZERO,
        }
    }

    pub async fn after_place(&self) {
        pause(self.place_delay).await;
    }

    pub async fn after_photo(&self) {
        pause(self.photo_delay).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            place_delay: Duration::from_millis(1500),
            photo_delay: Duration::from_millis(500),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
