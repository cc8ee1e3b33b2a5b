// Route exports
pub mod catalog;
pub mod feed;
pub mod profile;

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

use crate::config::FeedSettings;
use crate::core::FeedRanker;
use crate::models::ErrorResponse;
use crate::services::{CacheError, CacheManager, GeminiClient, ImageGenerator, ProfileStore, SanityClient, SanityError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sanity: Arc<SanityClient>,
    pub gemini: Arc<GeminiClient>,
    /// Present only when an OpenAI key is configured
    pub image_generator: Option<Arc<ImageGenerator>>,
    pub cache: Arc<CacheManager>,
    pub store: Arc<ProfileStore>,
    pub ranker: FeedRanker,
    pub feed: FeedSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(feed::configure)
            .configure(profile::configure)
            .configure(catalog::configure),
    );
}

/// 400 response for a request that fails validation, if it does
pub(crate) fn validation_error<T: Validate>(req: &T) -> Option<HttpResponse> {
    req.validate().err().map(|errors| {
        tracing::info!("Validation failed: {}", errors);
        HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ))
    })
}

pub(crate) fn internal_error(error: &str, e: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", error, e);
    HttpResponse::InternalServerError().json(ErrorResponse::new(error, e.to_string(), 500))
}

pub(crate) fn not_found(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(error, message, 404))
}

/// Read-through cache for catalog queries
///
/// Cache failures never fail the request; the catalog is queried directly.
pub(crate) async fn cached<T, F, Fut>(cache: &CacheManager, key: &str, fetch: F) -> Result<T, SanityError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, SanityError>>,
{
    match cache.get::<T>(key).await {
        Ok(value) => return Ok(value),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
    }

    let value = fetch().await?;
    if let Err(e) = cache.set(key, &value).await {
        tracing::warn!("Cache write failed for {}: {}", key, e);
    }
    Ok(value)
}

/// Log a catalog failure and fall back to an empty result
pub(crate) fn or_empty<T>(result: Result<Vec<T>, SanityError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch {}: {}", what, e);
        Vec::new()
    })
}
