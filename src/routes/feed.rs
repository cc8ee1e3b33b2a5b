use actix_web::{web, HttpResponse, Responder};

use crate::core::{build_sections, FeedRanker};
use crate::models::{
    Candidate, DiscoverResponse, FeedItem, FeedRequest, FeedResponse, HealthResponse,
    InspirationQuery, OnboardingData, PreferenceProfile, Product,
};
use crate::routes::{cached, internal_error, not_found, or_empty, validation_error, AppState};
use crate::services::{CacheKey, SanityError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/feed", web::post().to(personalized_feed))
        .route("/feed/discover", web::post().to(discover))
        .route("/inspiration", web::get().to(inspiration))
        .route("/products/{id}", web::get().to(get_product))
        .route("/products/{id}/similar", web::get().to(similar_products));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.store.health_check().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_entries: state.cache.stats().l1_size,
        timestamp: chrono::Utc::now(),
    })
}

async fn candidate_pool(state: &AppState) -> Vec<Candidate> {
    let size = state.feed.candidate_pool_size;
    let result = cached(&state.cache, &CacheKey::candidate_pool(size), || {
        state.sanity.fetch_candidate_pool(size)
    })
    .await;
    or_empty(result, "feed candidates")
}

async fn latest_items(state: &AppState) -> Vec<FeedItem> {
    let limit = state.feed.latest_limit;
    let result = cached(&state.cache, &CacheKey::latest(limit), || {
        state.sanity.latest_generations(limit)
    })
    .await;

    or_empty(result, "latest generations")
        .iter()
        .filter(|p| p.image_url.is_some())
        .map(FeedItem::from)
        .collect()
}

async fn stored_profile(state: &AppState, user_id: &str) -> Result<Option<OnboardingData>, HttpResponse> {
    state
        .store
        .get_profile(user_id)
        .await
        .map_err(|e| internal_error("Failed to fetch profile", e))
}

/// Ranked feed for a user
///
/// POST /api/v1/feed
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "preferences": { "interestedMaterials": [], "architecturalStyle": "", "projectType": "" },
///   "limit": 50
/// }
/// ```
///
/// `preferences` overrides the stored profile.
async fn personalized_feed(state: web::Data<AppState>, req: web::Json<FeedRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let preferences = match &req.preferences {
        Some(p) => PreferenceProfile {
            taste_vector: p.taste_vector.map(|t| t.normalized()),
            ..p.clone()
        },
        None => match stored_profile(&state, &req.user_id).await {
            Ok(Some(data)) => PreferenceProfile::from(&data),
            Ok(None) => return not_found("Profile not found", format!("No profile for user {}", req.user_id)),
            Err(resp) => return resp,
        },
    };

    let limit = req
        .limit
        .map(|l| (l as usize).min(state.ranker.limit()))
        .unwrap_or(state.ranker.limit());
    let ranker = FeedRanker::new(*state.ranker.weights(), limit);

    let candidates = candidate_pool(&state).await;
    let result = ranker.rank(&preferences, candidates);

    tracing::info!(
        "Returning {} feed items for user {} (from {} candidates)",
        result.items.len(),
        req.user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FeedResponse {
        items: result.items,
        total_candidates: result.total_candidates,
    })
}

/// Sectioned discover page for a user with a stored profile
///
/// POST /api/v1/feed/discover
async fn discover(state: web::Data<AppState>, req: web::Json<FeedRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let user = match stored_profile(&state, &req.user_id).await {
        Ok(Some(data)) => data,
        Ok(None) => return not_found("Profile not found", format!("No profile for user {}", req.user_id)),
        Err(resp) => return resp,
    };

    let preferences = PreferenceProfile::from(&user);
    let candidates = candidate_pool(&state).await;
    let ranked = state.ranker.rank(&preferences, candidates);
    let favorites = latest_items(&state).await;

    let sections = build_sections(&user, &ranked.items, favorites);
    HttpResponse::Ok().json(DiscoverResponse { sections })
}

/// Quiz deck for the given selections
///
/// GET /api/v1/inspiration?materials=Brick%20Tile,Exposed%20Brick&style=Rustic
async fn inspiration(state: web::Data<AppState>, query: web::Query<InspirationQuery>) -> impl Responder {
    let materials = query.material_list();
    let key = CacheKey::inspiration(&materials, &query.style);

    let result = cached(&state.cache, &key, || {
        state.sanity.inspiration_images(&materials, &query.style)
    })
    .await;

    HttpResponse::Ok().json(or_empty(result, "inspiration images"))
}

async fn fetch_product(state: &AppState, id: &str) -> Result<Option<Product>, SanityError> {
    cached(&state.cache, &CacheKey::product(id), || state.sanity.product_by_id(id)).await
}

/// GET /api/v1/products/{id}
async fn get_product(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match fetch_product(&state, &id).await {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => not_found("Product not found", format!("No catalog item {}", id)),
        Err(e) => {
            tracing::error!("Failed to fetch product {}: {}", id, e);
            not_found("Product not found", format!("No catalog item {}", id))
        }
    }
}

/// Up to four items sharing material or style
///
/// GET /api/v1/products/{id}/similar
async fn similar_products(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    let product = match fetch_product(&state, &id).await {
        Ok(Some(product)) => product,
        Ok(None) => return not_found("Product not found", format!("No catalog item {}", id)),
        Err(e) => {
            tracing::error!("Failed to fetch product {}: {}", id, e);
            return HttpResponse::Ok().json(Vec::<Candidate>::new());
        }
    };

    let material = product.material.clone().unwrap_or_default();
    let style = product.style.clone().unwrap_or_default();
    let result = cached(&state.cache, &CacheKey::similar(&id), || {
        state.sanity.similar_items(&id, &material, &style)
    })
    .await;

    HttpResponse::Ok().json(or_empty(result, "similar items"))
}
