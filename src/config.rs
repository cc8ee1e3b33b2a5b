use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub sanity: SanitySettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanitySettings {
    pub project_id: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Overrides the project API host, e.g. for a local mock
    pub endpoint: Option<String>,
    pub token: Option<String>,
}

impl SanitySettings {
    pub fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("https://{}.api.sanity.io", self.project_id))
    }
}

fn default_dataset() -> String { "production".to_string() }
fn default_api_version() -> String { "2023-05-03".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_gemini_model() -> String { "gemini-1.5-flash".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Generation is disabled without a key
    pub api_key: Option<String>,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_openai_endpoint(),
            image_model: default_image_model(),
            api_key: None,
        }
    }
}

fn default_openai_endpoint() -> String { "https://api.openai.com".to_string() }
fn default_image_model() -> String { "dall-e-3".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    /// Newest catalog records considered for ranking
    #[serde(default = "default_candidate_pool_size")]
    pub candidate_pool_size: usize,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
    /// Items in the favorites section of the discover page
    #[serde(default = "default_latest_limit")]
    pub latest_limit: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            candidate_pool_size: default_candidate_pool_size(),
            feed_limit: default_feed_limit(),
            latest_limit: default_latest_limit(),
        }
    }
}

fn default_candidate_pool_size() -> usize { 200 }
fn default_feed_limit() -> usize { 50 }
fn default_latest_limit() -> usize { 8 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. config/default.toml
    /// 2. config/local.toml (development overrides)
    /// 3. Environment variables prefixed with URBANCLAY,
    ///    e.g. URBANCLAY__SERVER__PORT -> server.port
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("URBANCLAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_provider_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("URBANCLAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honor the conventional provider variables
///
/// `DATABASE_URL`, `SANITY_API_TOKEN`, `GEMINI_API_KEY` and `OPENAI_API_KEY`
/// are what most deployments already export.
fn apply_provider_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("SANITY_API_TOKEN", "sanity.token"),
        ("NEXT_PUBLIC_SANITY_PROJECT_ID", "sanity.project_id"),
        ("GEMINI_API_KEY", "gemini.api_key"),
        ("OPENAI_API_KEY", "openai.api_key"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
