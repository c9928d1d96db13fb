// src/bin/seed.rs
// DOCUMENTATION: Seed importer entry point
// PURPOSE: Load curated beach descriptors from a JSON file and import them through the
// Places provider into the directory and photo cache
//
// Usage: cargo run --bin seed -- [path/to/beaches.json]

use anyhow::{bail, Context, Result};
use beach_cache::config::{init_db_pool, Config};
use beach_cache::models::BeachSeed;
use beach_cache::services::{PipelineDeps, SeedService};
use dotenv::dotenv;
use std::path::PathBuf;

const DEFAULT_SEED_FILE: &str = "data/beaches.json";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,sqlx=warn");
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        bail!("Configuration error: {}", e);
    }

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_FILE));

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let seeds: Vec<BeachSeed> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    log::info!("Loaded {} beach descriptors from {}", seeds.len(), path.display());

    let pool = init_db_pool(&config)
        .await
        .context("connecting to the database")?;
    let deps = PipelineDeps::from_config(&config, pool).context("building pipeline clients")?;

    let stats = SeedService::seed_beaches(&deps, &seeds).await;

    for error in &stats.errors {
        log::warn!("  {}", error);
    }
    log::info!(
        "Done: {} success, {} failed ({} photos cached)",
        stats.succeeded,
        stats.failed,
        stats.photos_cached
    );

    Ok(())
}
