use rand::Rng;

use crate::core::filters::{
    heritage_affinity, luxury_affinity, matches_material, matches_project_type, matches_style,
    modern_affinity, rustic_affinity,
};
use crate::models::{Candidate, PreferenceProfile, ScoringWeights, TasteVector};

/// Deterministic part of a candidate's score
///
/// Additive, no normalization:
/// material match + style match + project type match + taste-vector bonuses.
pub fn score_floor(
    candidate: &Candidate,
    preferences: &PreferenceProfile,
    weights: &ScoringWeights,
) -> f64 {
    let mut score = 0.0;

    if matches_material(candidate, preferences) {
        score += weights.material;
    }
    if matches_style(candidate, preferences) {
        score += weights.style;
    }
    if matches_project_type(candidate, preferences) {
        score += weights.project_type;
    }

    if let Some(taste) = &preferences.taste_vector {
        score += taste_bonus(candidate, taste, weights);
    }

    score
}

/// Bonus points from the swipe-quiz taste vector
#[inline]
pub fn taste_bonus(candidate: &Candidate, taste: &TasteVector, weights: &ScoringWeights) -> f64 {
    let mut bonus = 0.0;

    if modern_affinity(candidate, taste) {
        bonus += weights.modern_bias;
    }
    if heritage_affinity(candidate, taste) {
        bonus += weights.heritage_bias;
    }
    if rustic_affinity(candidate, taste) {
        bonus += weights.rustic_bias;
    }
    if luxury_affinity(candidate, taste) {
        bonus += weights.luxury_bias;
    }

    bonus
}

/// Serendipity jitter, uniform in `[0, weights.jitter)`
///
/// Two requests with identical inputs rank differently on purpose so a
/// refresh surfaces new items.
#[inline]
pub fn jitter<R: Rng + ?Sized>(weights: &ScoringWeights, rng: &mut R) -> f64 {
    if weights.jitter > 0.0 {
        rng.gen_range(0.0..weights.jitter)
    } else {
        0.0
    }
}

/// Full score for one candidate: floor plus jitter
pub fn score_candidate<R: Rng + ?Sized>(
    candidate: &Candidate,
    preferences: &PreferenceProfile,
    weights: &ScoringWeights,
    rng: &mut R,
) -> f64 {
    score_floor(candidate, preferences, weights) + jitter(weights, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(material: &str, style: &str, project_type: &str) -> Candidate {
        Candidate {
            id: "c1".to_string(),
            title: Some("Facade".to_string()),
            image_url: Some("https://cdn.test/c1.jpg".to_string()),
            material: Some(material.to_string()),
            style: Some(style.to_string()),
            project_type: Some(project_type.to_string()),
        }
    }

    fn preferences(taste: Option<TasteVector>) -> PreferenceProfile {
        PreferenceProfile {
            interested_materials: vec!["Exposed Brick".to_string()],
            architectural_style: "Rustic".to_string(),
            project_type: "Commercial".to_string(),
            taste_vector: taste,
        }
    }

    #[test]
    fn test_base_rules_add_up() {
        let weights = ScoringWeights::default();
        let prefs = preferences(None);

        let all = candidate("Exposed Brick", "Rustic", "Commercial");
        assert_eq!(score_floor(&all, &prefs, &weights), 90.0);

        let material_style = candidate("Exposed Brick", "Rustic", "Residential");
        assert_eq!(score_floor(&material_style, &prefs, &weights), 70.0);

        let none = candidate("Brick Tile", "Contemporary", "Residential");
        assert_eq!(score_floor(&none, &prefs, &weights), 0.0);
    }

    #[test]
    fn test_taste_vector_ignored_when_absent() {
        let weights = ScoringWeights::default();
        let c = candidate("Exposed Brick", "Rustic", "Commercial");

        let without = score_floor(&c, &preferences(None), &weights);
        let neutral = score_floor(&c, &preferences(Some(TasteVector::default())), &weights);
        assert_eq!(without, neutral);
    }

    #[test]
    fn test_all_taste_bonuses() {
        let weights = ScoringWeights::default();
        // Rustic style + Exposed Brick + Commercial, low modernity, high rustic and luxury
        let taste = TasteVector { modernity: 0.1, rustic: 0.9, warmth: 0.5, luxury: 0.9 };
        let c = candidate("Exposed Brick", "Rustic", "Commercial");

        // heritage 15 + rustic 15 + luxury 20
        assert_eq!(taste_bonus(&c, &taste, &weights), 50.0);
        assert_eq!(score_floor(&c, &preferences(Some(taste)), &weights), 140.0);
    }

    #[test]
    fn test_modern_bonus() {
        let weights = ScoringWeights::default();
        let taste = TasteVector { modernity: 0.9, rustic: 0.0, warmth: 0.5, luxury: 0.0 };
        let c = candidate("Clay Facade Panels", "Modern Minimal", "Residential");

        assert_eq!(taste_bonus(&c, &taste, &weights), 15.0);
    }

    #[test]
    fn test_jitter_range() {
        let weights = ScoringWeights::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let j = jitter(&weights, &mut rng);
            assert!((0.0..10.0).contains(&j), "jitter {} out of range", j);
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let weights = ScoringWeights { jitter: 0.0, ..ScoringWeights::default() };
        let prefs = preferences(None);
        let c = candidate("Exposed Brick", "Rustic", "Commercial");
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(score_candidate(&c, &prefs, &weights, &mut rng), 90.0);
    }

    #[test]
    fn test_score_is_never_negative() {
        let weights = ScoringWeights::default();
        let prefs = preferences(None);
        let c = candidate("Brick Tile", "Contemporary", "Residential");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            assert!(score_candidate(&c, &prefs, &weights, &mut rng) >= 0.0);
        }
    }
}
