// src/handlers/beaches.rs
// DOCUMENTATION: Public directory handlers
// PURPOSE: Serve beaches from the cached tables only; these routes never call the
// Places provider

use crate::db::{BeachRepository, PhotoRepository, RatingRepository};
use crate::errors::BeachError;
use crate::models::{BeachDetailResponse, BeachType, DirectoryQuery, Island, Region};
use actix_web::{http::header, web, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use sqlx::PgPool;

const DIRECTORY_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

/// GET /api/beaches
/// List active beaches with their rating and primary photo
pub async fn list_beaches(
    pool: web::Data<PgPool>,
    query: web::Query<DirectoryQuery>,
) -> Result<impl Responder, BeachError> {
    let query = query.into_inner();
    check_filters(&query)?;

    let beaches = BeachRepository::search(pool.get_ref(), &query).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, DIRECTORY_CACHE_CONTROL))
        .json(beaches))
}

/// GET /api/beaches/{id}
/// Beach with its rating and every cached photo
pub async fn get_beach(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, BeachError> {
    let id = path.into_inner();

    let beach = BeachRepository::get_by_id(pool.get_ref(), &id).await?;
    let rating = RatingRepository::get_by_beach(pool.get_ref(), &id).await?;
    let photos = PhotoRepository::get_photos_by_beach(pool.get_ref(), &id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, DIRECTORY_CACHE_CONTROL))
        .json(BeachDetailResponse {
            beach,
            rating,
            photos,
        }))
}

/// Reject filter values outside the closed island/region/type sets
fn check_filters(query: &DirectoryQuery) -> Result<(), BeachError> {
    check_closed_set::<Island>("island", &query.island)?;
    check_closed_set::<Region>("region", &query.region)?;
    check_closed_set::<BeachType>("type", &query.beach_type)?;
    Ok(())
}

fn check_closed_set<T: DeserializeOwned>(
    name: &str,
    value: &Option<String>,
) -> Result<(), BeachError> {
    let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };

    serde_json::from_value::<T>(serde_json::Value::String(value.to_string()))
        .map(|_| ())
        .map_err(|_| BeachError::InvalidInput(format!("Unknown {} '{}'", name, value)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/beaches", web::get().to(list_beaches))
        .route("/api/beaches/{id}", web::get().to(get_beach));
}
