//! UrbanClay feed service
//!
//! Personalized discovery feed, onboarding and catalog tooling for a clay
//! building-materials brand. The ranking core is pure and synchronous; the
//! services layer talks to the CMS, the AI providers, Postgres and Redis.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_sections, FeedRanker, OnboardingWizard, RankResult, TasteQuiz};
pub use crate::models::{Candidate, PreferenceProfile, ScoredCandidate, ScoringWeights, TasteVector};
