// src/services/pipeline.rs
// DOCUMENTATION: Shared dependencies of the seed importer and the refresh jobs
// PURPOSE: Clients are built once at startup and handed to every job run

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{DirectoryStore, PgDirectory};
use crate::errors::BeachError;
use crate::services::{BlobStore, GooglePlacesClient, Pacing, PlaceProvider, VercelBlobClient};

#[derive(Clone)]
pub struct PipelineDeps {
    pub provider: Arc<dyn PlaceProvider>,
    pub blobs: Arc<dyn BlobStore>,
    pub directory: Arc<dyn DirectoryStore>,
    pub pacing: Pacing,
}

impl PipelineDeps {
    pub fn new(
        provider: Arc<dyn PlaceProvider>,
        blobs: Arc<dyn BlobStore>,
        directory: Arc<dyn DirectoryStore>,
        pacing: Pacing,
    ) -> Self {
        Self {
            provider,
            blobs,
            directory,
            pacing,
        }
    }

    /// Production wiring: Google Places, Vercel Blob and the Postgres directory
    pub fn from_config(config: &Config, pool: PgPool) -> Result<Self, BeachError> {
        let provider = GooglePlacesClient::new(
            config.google_maps_api_key.clone(),
            config.places_api_url.clone(),
        )?;
        let blobs = VercelBlobClient::new(
            config.blob_read_write_token.clone(),
            config.blob_api_url.clone(),
        )?;

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(blobs),
            Arc::new(PgDirectory::new(pool)),
            Pacing::from_config(config),
        ))
    }
}
