// Core algorithm exports
pub mod filters;
pub mod leads;
pub mod moodboard;
pub mod ranker;
pub mod scoring;
pub mod sections;
pub mod taste;
pub mod wizard;

pub use filters::dedup_by_image_url;
pub use leads::{high_ticket_score, rank_leads};
pub use moodboard::{Board, ItemKind, MoodboardError, MoodboardItem};
pub use ranker::{FeedRanker, RankResult, DEFAULT_FEED_LIMIT};
pub use scoring::{score_candidate, score_floor};
pub use sections::build_sections;
pub use taste::{QuizCard, Swipe, SwipeDirection, TasteQuiz};
pub use wizard::{OnboardingWizard, WizardError, WizardStep};
