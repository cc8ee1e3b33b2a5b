use crate::models::{ImageAnalysis, SearchFilters};
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const ANALYZE_PROMPT: &str = r#"Analyze this architectural image and classify the primary material.

Use these definitions to decide:
- "Terracotta Jali": perforated blocks, lattice patterns, see-through screens or geometric breathing walls.
- "Roofing Tile": sloping surfaces with interlocking clay tiles (Mangalore or Spanish style).
- "Clay Flooring": ground-level paving, square or rectangular clay tiles for paths, patios or interiors.
- "Brick Tile": thin, flat brick-like faces on vertical walls, distinct from full masonry.
- "Exposed Brick": structural full-sized masonry walls, often rougher texture.

Also generate a commercial product name from color, texture or form, and category,
for example "Antique Red Jali" or "Smoke Grey Linear Brick". Keep it under 5 words.

Return JSON only: { "style": string, "material": string, "name": string }"#;

const SEARCH_PROMPT: &str = r#"You are a search assistant for an architectural material library.
Transform the user's search query into structured filters.

Facets:
- Materials: "Brick Tile", "Exposed Brick", "Terracotta Jali", "Clay Flooring", "Roofing Tile", "Clay Ceiling Tile"
- Styles: "Modern Minimal", "Rustic", "Heritage", "Industrial", "Contemporary"
- Project Types: "Residential", "Commercial", "Hospitality", "Public", "Renovation"

Be fuzzy: "old school" means "Heritage", "clean" means "Modern Minimal".
Descriptive words that fit no facet (like "Dark", "Red", "Sunset") go in freeText.
Return JSON only: { "materials": [], "styles": [], "projectTypes": [], "freeText": string }"#;

/// Errors that can occur when calling the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Invalid model output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Gemini client for image classification and query parsing
///
/// Without an API key every call answers with a fixed fallback so the rest
/// of the service keeps working in development.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Answer used when no key is configured
    pub fn mock_analysis() -> ImageAnalysis {
        ImageAnalysis {
            style: "Modern Minimal".to_string(),
            material: "Exposed Brick".to_string(),
            name: None,
        }
    }

    async fn generate(&self, api_key: &str, parts: Vec<Value>) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(api_key)
        );

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "contents": [{ "parts": parts }] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Gemini request failed: {} - {}", status, body);
            return Err(GeminiError::ApiError(format!("generateContent returned {}", status)));
        }

        let body: Value = response.json().await?;
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or(GeminiError::EmptyResponse)
    }

    /// Classify style and material of an image
    pub async fn analyze_image(&self, bytes: &[u8], mime_type: &str) -> Result<ImageAnalysis, GeminiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("Gemini API key is not set, returning mock analysis");
            return Ok(Self::mock_analysis());
        };

        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        let text = self
            .generate(
                api_key,
                vec![
                    json!({ "text": ANALYZE_PROMPT }),
                    json!({ "inline_data": { "mime_type": mime_type, "data": data } }),
                ],
            )
            .await?;

        Ok(serde_json::from_str(strip_code_fences(&text))?)
    }

    /// Turn a natural-language query into catalog filters
    ///
    /// Never fails: without a key, or when the model misbehaves, the whole
    /// query becomes free text.
    pub async fn parse_search_query(&self, query: &str) -> SearchFilters {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("Gemini API key is not set, falling back to free text search");
            return SearchFilters::free_text(query);
        };

        let prompt = format!("{}\n\nUser query: \"{}\"", SEARCH_PROMPT, query);
        let parsed = match self.generate(api_key, vec![json!({ "text": prompt })]).await {
            Ok(text) => serde_json::from_str::<SearchFilters>(strip_code_fences(&text))
                .map_err(GeminiError::from),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(filters) => filters,
            Err(e) => {
                tracing::error!("Smart search parsing failed: {}", e);
                SearchFilters::free_text(query)
            }
        }
    }
}

/// Remove markdown code fences around a JSON answer
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_without_key_returns_fallbacks() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com".to_string(),
            "gemini-1.5-flash".to_string(),
            Some(String::new()),
        )
        .unwrap();

        assert!(!client.is_configured());

        let analysis = client.analyze_image(b"not an image", "image/jpeg").await.unwrap();
        assert_eq!(analysis, GeminiClient::mock_analysis());

        let filters = client.parse_search_query("red brick cafe").await;
        assert_eq!(filters, SearchFilters::free_text("red brick cafe"));
    }
}
