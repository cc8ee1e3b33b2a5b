// Service exports
pub mod cache;
pub mod gemini;
pub mod imagery;
pub mod openai;
pub mod postgres;
pub mod reindex;
pub mod sanity;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use gemini::{strip_code_fences, GeminiClient, GeminiError};
pub use imagery::resolve_reference_image;
pub use openai::{ImageGenError, ImageGenerator};
pub use postgres::{ProfileStore, StoreError};
pub use reindex::{ReindexError, ReindexOutcome, ReindexReport, Reindexer};
pub use sanity::{ReindexTarget, SanityClient, SanityError, PLACEHOLDER_IMAGE_URL};
