use rand::Rng;

use crate::core::{filters::dedup_by_image_url, scoring::score_candidate};
use crate::models::{Candidate, PreferenceProfile, ScoredCandidate, ScoringWeights};

/// Maximum number of items in a personalized feed
pub const DEFAULT_FEED_LIMIT: usize = 50;

/// Result of one ranking pass
#[derive(Debug)]
pub struct RankResult {
    pub items: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Feed ranking pipeline
///
/// # Pipeline Stages
/// 1. Score every candidate (rule points + jitter)
/// 2. Sort descending by score
/// 3. Drop repeated image URLs, keeping the highest-scored copy
/// 4. Truncate to the feed limit
#[derive(Debug, Clone)]
pub struct FeedRanker {
    weights: ScoringWeights,
    limit: usize,
}

impl FeedRanker {
    /// `limit` is capped at `DEFAULT_FEED_LIMIT`
    pub fn new(weights: ScoringWeights, limit: usize) -> Self {
        Self {
            weights,
            limit: limit.min(DEFAULT_FEED_LIMIT),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_FEED_LIMIT)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank candidates with the thread-local RNG
    pub fn rank(&self, preferences: &PreferenceProfile, candidates: Vec<Candidate>) -> RankResult {
        self.rank_with_rng(preferences, candidates, &mut rand::thread_rng())
    }

    /// Rank candidates drawing jitter from `rng`
    pub fn rank_with_rng<R: Rng + ?Sized>(
        &self,
        preferences: &PreferenceProfile,
        candidates: Vec<Candidate>,
        rng: &mut R,
    ) -> RankResult {
        let total_candidates = candidates.len();

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let score = score_candidate(&candidate, preferences, &self.weights, &mut *rng);
                let is_premium = candidate.is_premium();
                ScoredCandidate {
                    candidate,
                    is_premium,
                    score,
                }
            })
            .collect();

        // Stable sort, descending
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut items = dedup_by_image_url(scored);
        items.truncate(self.limit);

        tracing::debug!(
            "Ranked {} candidates into {} feed items",
            total_candidates,
            items.len()
        );

        RankResult {
            items,
            total_candidates,
        }
    }
}

impl Default for FeedRanker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
