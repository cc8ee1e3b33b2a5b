// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, FeedItem, FeedSection, ImageAnalysis, ImageMetadata, LeadSummary, LeadTime,
    OnboardingData, PreferenceProfile, Product, ProjectStage, Role, SavedItem, ScoredCandidate,
    ScoringWeights, SearchFilters, SectionLayout, TasteVector, PREMIUM_PROJECT_TYPES,
};
pub use requests::{
    CompleteOnboardingRequest, FeedRequest, InspirationQuery, ReindexRequest, SaveBoardRequest, SaveItemRequest,
    SearchRequest, TasteQuizRequest, UploadParams,
};
pub use responses::{DiscoverResponse, ErrorResponse, FeedResponse, HealthResponse, OnboardingResponse};
