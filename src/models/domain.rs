use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

/// Project types that mark a catalog record as premium (high-ticket)
pub const PREMIUM_PROJECT_TYPES: [&str; 2] = ["Commercial", "Industrial"];

/// Catalog record eligible for a personalized feed
///
/// Every field except the id may be missing in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "id", alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(rename = "projectType", default)]
    pub project_type: Option<String>,
}

impl Candidate {
    /// Commercial and industrial projects count as premium
    pub fn is_premium(&self) -> bool {
        self.project_type
            .as_deref()
            .map(|t| PREMIUM_PROJECT_TYPES.contains(&t))
            .unwrap_or(false)
    }
}

/// Taste profile derived from the swipe quiz, each dimension in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TasteVector {
    #[serde(default = "neutral")]
    pub modernity: f64,
    #[serde(default = "neutral")]
    pub rustic: f64,
    #[serde(default = "neutral")]
    pub warmth: f64,
    #[serde(default)]
    pub luxury: f64,
}

fn neutral() -> f64 { 0.5 }

impl Default for TasteVector {
    fn default() -> Self {
        Self {
            modernity: 0.5,
            rustic: 0.5,
            warmth: 0.5,
            luxury: 0.0,
        }
    }
}

/// Largest component a 0-1 taste vector may carry before it is read as 0-100
pub const PERCENT_SCALE_THRESHOLD: f64 = 1.5;

impl TasteVector {
    /// Bring the vector into [0, 1]
    ///
    /// Older clients report dimensions on a 0-100 scale. A vector whose largest
    /// component exceeds `PERCENT_SCALE_THRESHOLD` is read as percentages;
    /// anything else is clamped as-is.
    pub fn normalized(self) -> Self {
        let dims = [self.modernity, self.rustic, self.warmth, self.luxury];
        let max = dims.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
        let scale = if max > PERCENT_SCALE_THRESHOLD { 100.0 } else { 1.0 };
        let fix = |v: f64| {
            if v.is_finite() {
                (v / scale).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };

        Self {
            modernity: fix(self.modernity),
            rustic: fix(self.rustic),
            warmth: fix(self.warmth),
            luxury: fix(self.luxury),
        }
    }
}

/// The subset of a user's answers that drives feed scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "interestedMaterials", default)]
    pub interested_materials: Vec<String>,
    #[serde(rename = "architecturalStyle", default)]
    pub architectural_style: String,
    #[serde(rename = "projectType", default)]
    pub project_type: String,
    #[serde(rename = "tasteVector", default)]
    pub taste_vector: Option<TasteVector>,
}

impl From<&OnboardingData> for PreferenceProfile {
    fn from(data: &OnboardingData) -> Self {
        Self {
            interested_materials: data.interested_materials.clone(),
            architectural_style: data.architectural_style.clone(),
            project_type: data.project_type.clone(),
            taste_vector: data.taste_vector.map(TasteVector::normalized),
        }
    }
}

/// Candidate plus its score for one ranking pass
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(rename = "isPremium")]
    pub is_premium: bool,
    pub score: f64,
}

/// Point values for the feed scorer
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub material: f64,
    pub style: f64,
    pub project_type: f64,
    pub modern_bias: f64,
    pub heritage_bias: f64,
    pub rustic_bias: f64,
    pub luxury_bias: f64,
    /// Upper bound (exclusive) of the serendipity jitter
    pub jitter: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            material: 40.0,
            style: 30.0,
            project_type: 20.0,
            modern_bias: 15.0,
            heritage_bias: 15.0,
            rustic_bias: 15.0,
            luxury_bias: 20.0,
            jitter: 10.0,
        }
    }
}

/// Card shown in a discover section or saved to a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "isPremium", default)]
    pub is_premium: bool,
}

impl From<&ScoredCandidate> for FeedItem {
    fn from(scored: &ScoredCandidate) -> Self {
        let c = &scored.candidate;
        Self {
            id: c.id.clone(),
            title: c.title.clone().unwrap_or_default(),
            category: c
                .material
                .clone()
                .unwrap_or_else(|| "Architectural Element".to_string()),
            image_url: c.image_url.clone().unwrap_or_default(),
            tags: [c.style.clone(), c.project_type.clone()]
                .into_iter()
                .flatten()
                .collect(),
            is_premium: scored.is_premium,
        }
    }
}

impl From<&Product> for FeedItem {
    fn from(product: &Product) -> Self {
        let premium = product
            .project_type
            .as_deref()
            .map(|t| PREMIUM_PROJECT_TYPES.contains(&t))
            .unwrap_or(false);

        Self {
            id: product.id.clone(),
            title: product.title.clone().unwrap_or_default(),
            category: product
                .material
                .clone()
                .unwrap_or_else(|| "Architectural Element".to_string()),
            image_url: product.image_url.clone().unwrap_or_default(),
            tags: [product.style.clone(), product.project_type.clone()]
                .into_iter()
                .flatten()
                .collect(),
            is_premium: premium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    Grid,
    Carousel,
}

/// One titled block on the discover page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSection {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(rename = "type")]
    pub layout: SectionLayout,
    pub items: Vec<FeedItem>,
}

/// Item in a user's saved collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    #[serde(flatten)]
    pub item: FeedItem,
    #[serde(rename = "savedAt")]
    pub saved_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Architect,
    Builder,
    Contractor,
    #[serde(rename = "Property Owner")]
    PropertyOwner,
    #[serde(rename = "Interior Designer")]
    InteriorDesigner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStage {
    Concept,
    #[serde(rename = "Design Development")]
    DesignDevelopment,
    Budgeting,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadTime {
    Immediately,
    #[serde(rename = "1 Month")]
    OneMonth,
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[serde(rename = "Just Exploring")]
    JustExploring,
}

/// Everything collected by the onboarding wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub portfolio_project_types: Vec<String>,
    #[serde(default = "default_true")]
    pub working_on_project: bool,
    #[serde(default)]
    pub project_location: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub project_stage: Option<ProjectStage>,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub architectural_style: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub lead_time: Option<LeadTime>,
    #[serde(default)]
    pub interested_materials: Vec<String>,
    #[serde(default)]
    pub color_preference: String,
    #[serde(default)]
    pub taste_vector: Option<TasteVector>,
}

fn default_true() -> bool { true }

/// Forms send `""` for unanswered single-choice questions
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
    }
}

/// Descriptive metadata for a catalog image, used to seed retrieval and generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub title: String,
    pub description: String,
    pub style: String,
    pub material: String,
    pub color_profile: String,
    pub project_type: String,
    pub climate: String,
    pub lighting_style: String,
    pub composition_style: String,
    pub texture_level: String,
    pub embedding_hint: String,
}

impl ImageMetadata {
    /// Seed metadata for the reference image requested when onboarding completes
    pub fn onboarding_seed(data: &OnboardingData) -> Self {
        let material = data
            .interested_materials
            .first()
            .cloned()
            .unwrap_or_else(|| "Clay".to_string());

        Self {
            title: format!("{} for {}", data.project_type, data.project_location),
            description: format!(
                "A custom generated {} project featuring {}",
                data.architectural_style, material
            ),
            style: data.architectural_style.clone(),
            material: material.clone(),
            color_profile: data.color_preference.clone(),
            project_type: data.project_type.clone(),
            climate: "Contextual".to_string(),
            lighting_style: "Golden Hour".to_string(),
            composition_style: "Cinematic Wide".to_string(),
            texture_level: "High".to_string(),
            embedding_hint: format!(
                "{}, {}, {}, cinematic lighting",
                data.architectural_style, material, data.project_type
            ),
        }
    }
}

/// Vision model classification of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub style: String,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Structured catalog filters extracted from a natural-language query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moods: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}

impl SearchFilters {
    pub fn free_text(query: &str) -> Self {
        Self {
            free_text: Some(query.to_string()),
            ..Self::default()
        }
    }
}

/// Catalog record as shown on the product page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id", alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(rename = "projectType", default)]
    pub project_type: Option<String>,
    #[serde(rename = "generatedAt", default)]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Lead row for the sales dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub user_id: String,
    pub name: String,
    pub role: Option<Role>,
    pub business_name: String,
    pub location: String,
    pub project_type: String,
    pub preferred_style: String,
    pub saved_materials: usize,
    pub score: u32,
}
