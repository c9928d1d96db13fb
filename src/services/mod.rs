// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod blob_store;
pub mod google_places_client;
pub mod pacing;
pub mod photo_cache;
pub mod photo_refresher;
pub mod pipeline;
pub mod rating_refresher;
pub mod seed_service;

pub use blob_store::*;
pub use google_places_client::*;
pub use pacing::*;
pub use photo_cache::*;
pub use photo_refresher::*;
pub use pipeline::*;
pub use rating_refresher::*;
pub use seed_service::*;
