use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::core::rank_leads;
use crate::models::{ErrorResponse, ReindexRequest, SearchRequest, UploadParams};
use crate::routes::{internal_error, or_empty, validation_error, AppState};
use crate::services::{CacheKey, Reindexer};

/// Largest accepted image upload
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/search", web::post().to(smart_search))
        .route("/catalog/analyze", web::post().to(analyze_image))
        .route("/catalog/reindex", web::post().to(reindex_catalog))
        .route("/catalog/upload", web::post().to(upload_image))
        .route("/sales/leads", web::get().to(list_leads));
}

fn content_type(req: &HttpRequest) -> String {
    req.headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("image/"))
        .unwrap_or("image/jpeg")
        .to_string()
}

fn check_image_body(body: &web::Bytes) -> Option<HttpResponse> {
    if body.is_empty() {
        return Some(HttpResponse::BadRequest().json(ErrorResponse::new(
            "No file uploaded",
            "Request body must contain the image bytes",
            400,
        )));
    }
    if body.len() > MAX_UPLOAD_BYTES {
        return Some(HttpResponse::PayloadTooLarge().json(ErrorResponse::new(
            "File too large",
            format!("Images are limited to {} bytes", MAX_UPLOAD_BYTES),
            413,
        )));
    }
    None
}

/// Natural-language catalog search
///
/// POST /api/v1/search
///
/// The query is turned into structured filters first; the response echoes
/// them so the client can show what was understood.
async fn smart_search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Some(resp) = validation_error(&*req) {
        return resp;
    }

    let filters = state.gemini.parse_search_query(&req.query).await;
    tracing::debug!("Search '{}' parsed as {:?}", req.query, filters);

    let results = or_empty(state.sanity.search_catalog(&filters).await, "search results");

    HttpResponse::Ok().json(json!({
        "filters": filters,
        "results": results,
    }))
}

/// Classify an uploaded image without storing it
///
/// POST /api/v1/catalog/analyze, body is the raw image
async fn analyze_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    if let Some(resp) = check_image_body(&body) {
        return resp;
    }

    match state.gemini.analyze_image(&body, &content_type(&req)).await {
        Ok(analysis) => HttpResponse::Ok().json(analysis),
        Err(e) => {
            tracing::error!("AI analysis failed: {}", e);
            HttpResponse::Ok().json(serde_json::Value::Null)
        }
    }
}

/// Re-classify catalog images
///
/// POST /api/v1/catalog/reindex
async fn reindex_catalog(
    state: web::Data<AppState>,
    req: Option<web::Json<ReindexRequest>>,
) -> impl Responder {
    let force_all = req.map(|r| r.force_all).unwrap_or(false);

    let reindexer = match Reindexer::new(&state.sanity, &state.gemini) {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to start re-index", e),
    };

    let report = match reindexer.run(force_all).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Failed to fetch images for re-indexing: {}", e);
            return HttpResponse::Ok().json(json!({ "total": 0, "succeeded": 0, "failed": 0, "results": [] }));
        }
    };

    if report.succeeded > 0 {
        if let Err(e) = state.cache.invalidate_pattern(CacheKey::CATALOG_PATTERN).await {
            tracing::warn!("Failed to invalidate catalog cache: {}", e);
        }
    }

    HttpResponse::Ok().json(report)
}

/// Add a photo to the catalog
///
/// POST /api/v1/catalog/upload?material=..&style=..&projectType=..&filename=..
async fn upload_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> impl Responder {
    if let Some(resp) = validation_error(&*params) {
        return resp;
    }
    if let Some(resp) = check_image_body(&body) {
        return resp;
    }

    let params = params.into_inner();
    let filename = params
        .filename
        .clone()
        .unwrap_or_else(|| format!("upload-{}.jpg", uuid::Uuid::new_v4()));

    let result = state
        .sanity
        .upload_image(
            body.to_vec(),
            &content_type(&req),
            &filename,
            &params.material,
            &params.style,
            &params.project_type,
        )
        .await;

    match result {
        Ok(id) => {
            if let Err(e) = state.cache.invalidate_pattern(CacheKey::CATALOG_PATTERN).await {
                tracing::warn!("Failed to invalidate catalog cache: {}", e);
            }
            HttpResponse::Created().json(json!({ "success": true, "id": id }))
        }
        Err(e) => internal_error("Upload failed", e),
    }
}

/// Sales dashboard leads, hottest first
///
/// GET /api/v1/sales/leads
async fn list_leads(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_profiles().await {
        Ok(profiles) => HttpResponse::Ok().json(rank_leads(profiles)),
        Err(e) => internal_error("Failed to fetch leads", e),
    }
}
