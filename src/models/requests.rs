use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::moodboard::Board;
use crate::core::taste::{QuizCard, Swipe};
use crate::models::domain::{FeedItem, OnboardingData, PreferenceProfile};

/// Request for a personalized feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    /// Overrides the stored profile, e.g. while the quiz is still running
    #[serde(default)]
    pub preferences: Option<PreferenceProfile>,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Natural-language catalog search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 500))]
    pub query: String,
}

/// Final submission of the onboarding wizard
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteOnboardingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub data: OnboardingData,
}

/// Add a card to the saved collection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveItemRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub item: FeedItem,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fold swipe decisions into a taste vector
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TasteQuizRequest {
    #[validate(length(min = 1))]
    pub cards: Vec<QuizCard>,
    #[serde(default)]
    pub swipes: Vec<Swipe>,
}

/// Store a moodboard for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveBoardRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub board: Board,
}

/// Start a catalog re-index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReindexRequest {
    #[serde(rename = "forceAll", default)]
    pub force_all: bool,
}

/// Query parameters for a direct catalog upload; the body carries the image
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadParams {
    #[validate(length(min = 1))]
    pub material: String,
    #[validate(length(min = 1))]
    pub style: String,
    #[validate(length(min = 1))]
    #[serde(rename = "projectType")]
    pub project_type: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Query for quiz inspiration images; materials are comma separated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspirationQuery {
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub style: String,
}

impl InspirationQuery {
    pub fn material_list(&self) -> Vec<String> {
        self.materials
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}
