use crate::models::{Candidate, ImageAnalysis, ImageMetadata, Product, SearchFilters};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Document type holding catalog photos
pub const DOCUMENT_TYPE: &str = "architecturalImage";

/// Shown when the catalog has nothing to offer
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/1024x1024/1a1a1a/FFF?text=Upload+Actual+Photos+To+Sanity";

const CANDIDATE_PROJECTION: &str = r#"{
    _id,
    title,
    "imageUrl": image.asset->url,
    style,
    material,
    projectType
}"#;

const PRODUCT_PROJECTION: &str = r#"{
    _id,
    title,
    description,
    "imageUrl": image.asset->url,
    style,
    material,
    projectType,
    generatedAt
}"#;

/// Errors that can occur when interacting with Sanity
#[derive(Debug, Error)]
pub enum SanityError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid or missing API token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Image that needs (re)classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReindexTarget {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Sanity content lake client
///
/// Handles all communication with the CMS including:
/// - GROQ queries for feed candidates, search and product pages
/// - Patching AI-derived metadata onto images
/// - Uploading new catalog photos
pub struct SanityClient {
    base_url: String,
    api_version: String,
    dataset: String,
    token: Option<String>,
    client: Client,
}

impl SanityClient {
    /// Create a new Sanity client
    pub fn new(
        base_url: String,
        api_version: String,
        dataset: String,
        token: Option<String>,
    ) -> Result<Self, SanityError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version,
            dataset,
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }

    fn endpoint(&self, kind: &str) -> String {
        format!(
            "{}/v{}/{}/{}",
            self.base_url, self.api_version, kind, self.dataset
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response, SanityError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SanityError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Sanity {} failed: {} - {}", action, status, body);
            return Err(SanityError::ApiError(format!("Failed to {}: {}", action, status)));
        }
        Ok(response)
    }

    /// Run a GROQ query with JSON-encoded parameters
    pub async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, SanityError> {
        let mut url = format!(
            "{}?query={}",
            self.endpoint("data/query"),
            urlencoding::encode(groq)
        );
        for (name, value) in params {
            let encoded = serde_json::to_string(value)
                .map_err(|e| SanityError::InvalidResponse(e.to_string()))?;
            url.push_str(&format!("&%24{}={}", name, urlencoding::encode(&encoded)));
        }

        tracing::debug!("Running GROQ query: {}", groq);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check(response, "run query").await?;

        let body: QueryResponse<T> = response
            .json()
            .await
            .map_err(|e| SanityError::InvalidResponse(format!("Failed to parse query result: {}", e)))?;

        Ok(body.result)
    }

    /// Apply a list of mutations in one transaction
    pub async fn mutate(&self, mutations: Vec<Value>) -> Result<Vec<String>, SanityError> {
        let url = format!("{}?returnIds=true", self.endpoint("data/mutate"));

        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;
        let response = Self::check(response, "apply mutations").await?;

        let body: Value = response.json().await?;
        let ids = body
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| SanityError::InvalidResponse("Missing results array".into()))?
            .iter()
            .filter_map(|r| r.get("id").and_then(|id| id.as_str()).map(str::to_string))
            .collect();

        Ok(ids)
    }

    /// Newest catalog records, the candidate pool for feed ranking
    pub async fn fetch_candidate_pool(&self, limit: usize) -> Result<Vec<Candidate>, SanityError> {
        let groq = format!(
            r#"*[_type == "{}"] | order(generatedAt desc)[0...{}] {}"#,
            DOCUMENT_TYPE, limit, CANDIDATE_PROJECTION
        );

        let candidates: Vec<Candidate> = self.query(&groq, &[]).await?;
        tracing::debug!("Fetched {} feed candidates", candidates.len());
        Ok(candidates)
    }

    /// Catalog photos for the swipe quiz
    ///
    /// Material match first, then style match, then anything recent, so the
    /// quiz never starts empty while the catalog has content.
    pub async fn inspiration_images(
        &self,
        materials: &[String],
        style: &str,
    ) -> Result<Vec<Candidate>, SanityError> {
        let by_material = format!(
            r#"*[_type == "{}" && material in $materials] [0...15] {}"#,
            DOCUMENT_TYPE, CANDIDATE_PROJECTION
        );
        let data: Vec<Candidate> = self
            .query(&by_material, &[("materials", json!(materials))])
            .await?;
        if !data.is_empty() {
            return Ok(data);
        }

        tracing::debug!("No material match for inspiration, trying style {}", style);
        let by_style = format!(
            r#"*[_type == "{}" && style == $style] [0...10] {}"#,
            DOCUMENT_TYPE, CANDIDATE_PROJECTION
        );
        let data: Vec<Candidate> = self.query(&by_style, &[("style", json!(style))]).await?;
        if !data.is_empty() {
            return Ok(data);
        }

        tracing::debug!("No style match for inspiration, using latest uploads");
        let any = format!(
            r#"*[_type == "{}"] | order(_createdAt desc) [0...10] {}"#,
            DOCUMENT_TYPE, CANDIDATE_PROJECTION
        );
        self.query(&any, &[]).await
    }

    /// Most recent catalog additions
    pub async fn latest_generations(&self, limit: usize) -> Result<Vec<Product>, SanityError> {
        let groq = format!(
            r#"*[_type == "{}"] | order(generatedAt desc) [0...{}] {}"#,
            DOCUMENT_TYPE, limit, PRODUCT_PROJECTION
        );
        self.query(&groq, &[]).await
    }

    /// Filter the catalog by structured search filters
    pub async fn search_catalog(&self, filters: &SearchFilters) -> Result<Vec<Product>, SanityError> {
        let (groq, params) = build_search_query(filters);
        let results: Vec<Product> = self.query(&groq, &params).await?;
        tracing::debug!("Smart search found {} items", results.len());
        Ok(results)
    }

    /// Up to four items sharing material or style, excluding `id`
    pub async fn similar_items(
        &self,
        id: &str,
        material: &str,
        style: &str,
    ) -> Result<Vec<Candidate>, SanityError> {
        let groq = format!(
            r#"*[_type == "{}" && _id != $id && (material == $material || style == $style)] | order(generatedAt desc)[0...4] {}"#,
            DOCUMENT_TYPE, CANDIDATE_PROJECTION
        );
        self.query(
            &groq,
            &[
                ("id", json!(id)),
                ("material", json!(material)),
                ("style", json!(style)),
            ],
        )
        .await
    }

    /// A single catalog record
    pub async fn product_by_id(&self, id: &str) -> Result<Option<Product>, SanityError> {
        let groq = format!(
            r#"*[_type == "{}" && _id == $id][0] {}"#,
            DOCUMENT_TYPE, PRODUCT_PROJECTION
        );
        self.query(&groq, &[("id", json!(id))]).await
    }

    /// Best existing catalog photo for the given metadata
    ///
    /// Exact material and style match, then material only, then the latest
    /// upload. `None` means the catalog is empty.
    pub async fn find_reference_image(
        &self,
        metadata: &ImageMetadata,
    ) -> Result<Option<String>, SanityError> {
        #[derive(Deserialize)]
        struct ImageRef {
            #[serde(rename = "imageUrl")]
            image_url: Option<String>,
        }

        let exact = format!(
            r#"*[_type == "{}" && material == $material && style == $style] | order(generatedAt desc)[0] {{ "imageUrl": image.asset->url }}"#,
            DOCUMENT_TYPE
        );
        let found: Option<ImageRef> = self
            .query(
                &exact,
                &[
                    ("material", json!(metadata.material)),
                    ("style", json!(metadata.style)),
                ],
            )
            .await?;
        if let Some(url) = found.and_then(|r| r.image_url) {
            tracing::info!("Found exact catalog match: {}", url);
            return Ok(Some(url));
        }

        let by_material = format!(
            r#"*[_type == "{}" && material == $material] | order(generatedAt desc)[0] {{ "imageUrl": image.asset->url }}"#,
            DOCUMENT_TYPE
        );
        let found: Option<ImageRef> = self
            .query(&by_material, &[("material", json!(metadata.material))])
            .await?;
        if let Some(url) = found.and_then(|r| r.image_url) {
            return Ok(Some(url));
        }

        let latest = format!(
            r#"*[_type == "{}"] | order(generatedAt desc)[0] {{ "imageUrl": image.asset->url }}"#,
            DOCUMENT_TYPE
        );
        let found: Option<ImageRef> = self.query(&latest, &[]).await?;
        Ok(found.and_then(|r| r.image_url))
    }

    /// Images whose style or material is missing, or every image when forced
    pub async fn images_to_reindex(&self, force_all: bool) -> Result<Vec<ReindexTarget>, SanityError> {
        let groq = if force_all {
            format!(r#"*[_type == "{}"] {{ _id, "url": image.asset->url }}"#, DOCUMENT_TYPE)
        } else {
            format!(
                r#"*[_type == "{}" && (!defined(style) || !defined(material))] {{ _id, "url": image.asset->url }}"#,
                DOCUMENT_TYPE
            )
        };

        let targets: Vec<ReindexTarget> = self.query(&groq, &[]).await?;
        tracing::info!("Found {} images to re-index", targets.len());
        Ok(targets)
    }

    /// Store vision-model classification on an image document
    pub async fn patch_analysis(&self, id: &str, analysis: &ImageAnalysis) -> Result<(), SanityError> {
        self.mutate(vec![json!({
            "patch": {
                "id": id,
                "set": {
                    "style": analysis.style,
                    "material": analysis.material,
                    "isAiAnalyzed": true,
                }
            }
        })])
        .await?;
        Ok(())
    }

    /// Upload a photo and create its catalog document
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        filename: &str,
        material: &str,
        style: &str,
        project_type: &str,
    ) -> Result<String, SanityError> {
        let url = format!(
            "{}?filename={}",
            self.endpoint("assets/images"),
            urlencoding::encode(filename)
        );

        tracing::info!("Uploading {} to Sanity", filename);

        let response = self
            .authorize(self.client.post(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let response = Self::check(response, "upload asset").await?;

        let body: Value = response.json().await?;
        let asset_id = body
            .pointer("/document/_id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| SanityError::InvalidResponse("Missing asset document id".into()))?
            .to_string();

        let doc = json!({
            "_type": DOCUMENT_TYPE,
            "title": format!("{} - {} ({})", material, project_type, style),
            "image": {
                "_type": "image",
                "asset": { "_type": "reference", "_ref": asset_id }
            },
            "material": material,
            "style": style,
            "projectType": project_type,
            "colorProfile": "Custom",
            "generatedAt": chrono::Utc::now().to_rfc3339(),
            "isUserUpload": true,
        });

        let ids = self.mutate(vec![json!({ "create": doc })]).await?;
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| SanityError::InvalidResponse("Create returned no id".into()))?;

        tracing::info!("Catalog document created: {}", id);
        Ok(id)
    }
}

/// GROQ and parameters for a smart search
///
/// Only filters that are present become conditions, so every referenced
/// parameter is bound.
pub fn build_search_query(filters: &SearchFilters) -> (String, Vec<(&'static str, Value)>) {
    let mut conditions = vec![format!(r#"_type == "{}""#, DOCUMENT_TYPE)];
    let mut params = Vec::new();

    if !filters.materials.is_empty() {
        conditions.push("material in $materials".to_string());
        params.push(("materials", json!(filters.materials)));
    }
    if !filters.styles.is_empty() {
        conditions.push("style in $styles".to_string());
        params.push(("styles", json!(filters.styles)));
    }
    if !filters.project_types.is_empty() {
        conditions.push("projectType in $projectTypes".to_string());
        params.push(("projectTypes", json!(filters.project_types)));
    }
    if let Some(text) = filters.free_text.as_deref().filter(|t| !t.trim().is_empty()) {
        conditions.push(
            r#"(title match $freeText + "*" || style match $freeText + "*" || material match $freeText + "*")"#
                .to_string(),
        );
        params.push(("freeText", json!(text)));
    }

    let groq = format!(
        "*[{}] | order(generatedAt desc) {}",
        conditions.join(" && "),
        PRODUCT_PROJECTION
    );
    (groq, params)
}
