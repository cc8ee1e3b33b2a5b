mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::FeedRanker;
use crate::routes::AppState;
use crate::services::{CacheManager, GeminiClient, ImageGenerator, ProfileStore, SanityClient};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(what: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    init_logging(&settings);
    info!("Starting UrbanClay feed service...");

    let sanity = Arc::new(
        SanityClient::new(
            settings.sanity.base_url(),
            settings.sanity.api_version.clone(),
            settings.sanity.dataset.clone(),
            settings.sanity.token.clone(),
        )
        .map_err(|e| startup_error("Failed to build Sanity client", e))?,
    );

    info!("Sanity client initialized (dataset: {})", settings.sanity.dataset);

    let gemini = Arc::new(
        GeminiClient::new(
            settings.gemini.endpoint.clone(),
            settings.gemini.model.clone(),
            settings.gemini.api_key.clone(),
        )
        .map_err(|e| startup_error("Failed to build Gemini client", e))?,
    );

    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is not set; image analysis and smart search use fallbacks");
    }

    let image_generator = match settings.openai.api_key.clone().filter(|k| !k.is_empty()) {
        Some(key) => Some(Arc::new(
            ImageGenerator::new(settings.openai.endpoint.clone(), settings.openai.image_model.clone(), key)
                .map_err(|e| startup_error("Failed to build image generator", e))?,
        )),
        None => {
            info!("Image generation disabled (no OpenAI key)");
            None
        }
    };

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = Arc::new(
        CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl)
            .await
            .map_err(|e| startup_error("Failed to connect to Redis", e))?,
    );

    info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let store = Arc::new(
        ProfileStore::new(
            &settings.database.url,
            db_max_conn,
            settings.database.min_connections.unwrap_or(1),
            settings.database.acquire_timeout_secs.unwrap_or(5),
            settings.database.idle_timeout_secs.unwrap_or(600),
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("Profile store initialized (max: {} connections)", db_max_conn);

    let weights = settings.scoring.weights;
    let ranker = FeedRanker::new(weights, settings.feed.feed_limit);
    if ranker.limit() < settings.feed.feed_limit {
        warn!("feed_limit {} exceeds the maximum, using {}", settings.feed.feed_limit, ranker.limit());
    }

    info!("Feed ranker initialized with weights: {:?}", weights);

    let app_state = AppState {
        sanity,
        gemini,
        image_generator,
        cache,
        store,
        ranker,
        feed: settings.feed.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PayloadConfig::new(routes::catalog::MAX_UPLOAD_BYTES))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
