use crate::models::ImageMetadata;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("No image in response")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// Text-to-image client for OpenAI `images/generations`
///
/// Only used when the catalog has no photo to show.
pub struct ImageGenerator {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl ImageGenerator {
    pub fn new(base_url: String, model: String, api_key: String) -> Result<Self, ImageGenError> {
        // Generation is slow, but a stuck request still needs a bound
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client,
        })
    }

    /// Build an image for the metadata and return its temporary URL
    pub async fn generate(&self, metadata: &ImageMetadata) -> Result<String, ImageGenError> {
        let url = format!("{}/v1/images/generations", self.base_url);
        tracing::info!("Generating image for {} / {}", metadata.material, metadata.style);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "prompt": build_prompt(metadata),
                "n": 1,
                "size": "1024x1024",
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Image generation failed: {} - {}", status, body);
            return Err(ImageGenError::ApiError(format!("images/generations returned {}", status)));
        }

        let body: GenerationResponse = response.json().await?;
        body.data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or(ImageGenError::EmptyResponse)
    }
}

/// Photographic prompt from catalog metadata
pub fn build_prompt(metadata: &ImageMetadata) -> String {
    format!(
        "Architectural photograph of a {} {} project built with {}. {}. \
         {} lighting, {} composition, {} texture detail, {} color palette, {} climate. \
         Photorealistic, no people, no text.",
        metadata.style,
        metadata.project_type,
        metadata.material,
        metadata.description,
        metadata.lighting_style,
        metadata.composition_style,
        metadata.texture_level,
        metadata.color_profile,
        metadata.climate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_material_and_style() {
        let metadata = ImageMetadata {
            style: "Rustic".to_string(),
            material: "Terracotta Jali".to_string(),
            project_type: "Residential".to_string(),
            ..ImageMetadata::default()
        };

        let prompt = build_prompt(&metadata);
        assert!(prompt.contains("Rustic Residential"));
        assert!(prompt.contains("Terracotta Jali"));
    }
}
