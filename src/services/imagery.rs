use crate::models::ImageMetadata;
use crate::services::openai::ImageGenerator;
use crate::services::sanity::{SanityClient, PLACEHOLDER_IMAGE_URL};

/// Pick an image for the metadata
///
/// Real catalog photos win. Generation only runs when the catalog has
/// nothing and a generator is configured. Every failure ends at the
/// placeholder, so this always yields a URL.
pub async fn resolve_reference_image(
    sanity: &SanityClient,
    generator: Option<&ImageGenerator>,
    metadata: &ImageMetadata,
) -> String {
    tracing::debug!("Resolving reference image for {:?}", metadata.title);

    match sanity.find_reference_image(metadata).await {
        Ok(Some(url)) => return url,
        Ok(None) => tracing::warn!("Catalog is empty, no reference photo available"),
        Err(e) => {
            tracing::error!("Catalog retrieval failed: {}", e);
            return PLACEHOLDER_IMAGE_URL.to_string();
        }
    }

    let Some(generator) = generator else {
        return PLACEHOLDER_IMAGE_URL.to_string();
    };

    match generator.generate(metadata).await {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Image generation failed: {}", e);
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    }
}
