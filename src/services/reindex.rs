use crate::models::ImageAnalysis;
use crate::services::gemini::{GeminiClient, GeminiError};
use crate::services::sanity::{ReindexTarget, SanityClient, SanityError};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReindexError {
    #[error("Image has no URL")]
    MissingUrl,

    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] GeminiError),

    #[error("Patch failed: {0}")]
    Patch(#[from] SanityError),
}

/// Outcome for one image
#[derive(Debug, Clone, Serialize)]
pub struct ReindexOutcome {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReindexReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ReindexOutcome>,
}

impl ReindexReport {
    fn from_outcomes(results: Vec<ReindexOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Re-classifies catalog images with the vision model
///
/// Images are processed one at a time to stay under provider rate limits.
/// A failing image is recorded and the batch moves on.
pub struct Reindexer<'a> {
    sanity: &'a SanityClient,
    gemini: &'a GeminiClient,
    http: Client,
}

impl<'a> Reindexer<'a> {
    pub fn new(sanity: &'a SanityClient, gemini: &'a GeminiClient) -> Result<Self, ReindexError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { sanity, gemini, http })
    }

    pub async fn run(&self, force_all: bool) -> Result<ReindexReport, SanityError> {
        let targets = self.sanity.images_to_reindex(force_all).await?;

        let mut results = Vec::with_capacity(targets.len());
        for target in &targets {
            let outcome = match self.reindex_one(target).await {
                Ok(analysis) => {
                    tracing::info!("Updated {} with {:?}", target.id, analysis);
                    ReindexOutcome {
                        id: target.id.clone(),
                        success: true,
                        metadata: Some(analysis),
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to re-index {}: {}", target.id, e);
                    ReindexOutcome {
                        id: target.id.clone(),
                        success: false,
                        metadata: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(outcome);
        }

        let report = ReindexReport::from_outcomes(results);
        tracing::info!(
            "Re-index finished: {} ok, {} failed",
            report.succeeded,
            report.failed
        );
        Ok(report)
    }

    async fn reindex_one(&self, target: &ReindexTarget) -> Result<ImageAnalysis, ReindexError> {
        let url = target.url.as_deref().ok_or(ReindexError::MissingUrl)?;
        tracing::debug!("Re-indexing image {}", target.id);

        let response = self.http.get(url).send().await?.error_for_status()?;
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?;

        let analysis = self.gemini.analyze_image(&bytes, &mime_type).await?;
        self.sanity.patch_analysis(&target.id, &analysis).await?;

        Ok(analysis)
    }
}
