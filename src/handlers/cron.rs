// src/handlers/cron.rs
// DOCUMENTATION: Scheduled job triggers
// PURPOSE: Run the rating and photo refresh jobs when the scheduler calls in with the
// shared secret

use crate::config::Config;
use crate::errors::BeachError;
use crate::services::{PhotoRefresher, PipelineDeps, RatingRefresher};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// GET /api/cron/refresh-ratings
pub async fn refresh_ratings(
    config: web::Data<Config>,
    deps: web::Data<PipelineDeps>,
    req: HttpRequest,
) -> Result<impl Responder, BeachError> {
    verify_cron_secret(&req, &config)?;

    log::info!("Rating refresh triggered");

    let stats = RatingRefresher::refresh_ratings(deps.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": stats.message(),
        "timestamp": Utc::now().to_rfc3339(),
        "stats": stats
    })))
}

/// GET /api/cron/refresh-photos
pub async fn refresh_photos(
    config: web::Data<Config>,
    deps: web::Data<PipelineDeps>,
    req: HttpRequest,
) -> Result<impl Responder, BeachError> {
    verify_cron_secret(&req, &config)?;

    log::info!("Photo refresh triggered");

    let stats = PhotoRefresher::refresh_photos(deps.get_ref(), Utc::now()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": stats.message(),
        "timestamp": Utc::now().to_rfc3339(),
        "stats": stats
    })))
}

/// Verify cron authorization
/// DOCUMENTATION: Expects `Authorization: Bearer <CRON_SECRET>`. With no secret
/// configured every trigger is rejected.
fn verify_cron_secret(req: &HttpRequest, config: &Config) -> Result<(), BeachError> {
    if config.cron_secret.is_empty() {
        log::warn!("Cron trigger rejected: CRON_SECRET is not configured");
        return Err(BeachError::Unauthorized);
    }

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Cron request without authorization header");
            BeachError::Unauthorized
        })?;

    if header != format!("Bearer {}", config.cron_secret) {
        log::warn!("Cron request with invalid secret");
        return Err(BeachError::Unauthorized);
    }

    Ok(())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/cron/refresh-ratings", web::get().to(refresh_ratings))
        .route("/api/cron/refresh-photos", web::get().to(refresh_photos));
}
