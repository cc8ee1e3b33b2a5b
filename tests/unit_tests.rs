// Unit tests for the UrbanClay feed core

use rand::rngs::StdRng;
use rand::SeedableRng;
use urbanclay_feed::core::{
    filters::{dedup_by_image_url, matches_material, matches_style},
    high_ticket_score,
    scoring::{score_candidate, score_floor, taste_bonus},
    wizard::is_valid_phone,
    TasteQuiz, SwipeDirection,
};
use urbanclay_feed::models::{
    Candidate, LeadTime, OnboardingData, PreferenceProfile, ProjectStage, Role, ScoredCandidate,
    ScoringWeights, TasteVector,
};

fn candidate(id: &str, material: &str, style: &str, project_type: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: Some(format!("Catalog {}", id)),
        image_url: Some(format!("https://cdn.sanity.test/{}.jpg", id)),
        material: Some(material.to_string()),
        style: Some(style.to_string()),
        project_type: Some(project_type.to_string()),
    }
}

fn preferences() -> PreferenceProfile {
    PreferenceProfile {
        interested_materials: vec!["Terracotta Jali".to_string(), "Brick Tile".to_string()],
        architectural_style: "Contemporary".to_string(),
        project_type: "Residential".to_string(),
        taste_vector: None,
    }
}

#[test]
fn test_full_match_floor_is_ninety() {
    let c = candidate("1", "Brick Tile", "Contemporary", "Residential");
    let floor = score_floor(&c, &preferences(), &ScoringWeights::default());
    assert_eq!(floor, 90.0);
}

#[test]
fn test_no_match_floor_is_zero() {
    let c = candidate("1", "Roofing Tile", "Heritage", "Commercial");
    assert_eq!(score_floor(&c, &preferences(), &ScoringWeights::default()), 0.0);
}

#[test]
fn test_missing_fields_never_match() {
    let c = Candidate {
        id: "bare".to_string(),
        title: None,
        image_url: Some("https://cdn.sanity.test/bare.jpg".to_string()),
        material: None,
        style: None,
        project_type: None,
    };
    let prefs = preferences();

    assert!(!matches_material(&c, &prefs));
    assert!(!matches_style(&c, &prefs));
    assert_eq!(score_floor(&c, &prefs, &ScoringWeights::default()), 0.0);
}

#[test]
fn test_taste_bonuses_stack() {
    let weights = ScoringWeights::default();
    let taste = TasteVector { modernity: 0.2, rustic: 0.9, warmth: 0.5, luxury: 0.9 };

    // Heritage bias, rustic bias and luxury bias all apply
    let c = candidate("1", "Exposed Brick", "Rustic", "Industrial");
    assert_eq!(taste_bonus(&c, &taste, &weights), 15.0 + 15.0 + 20.0);
}

#[test]
fn test_affinity_thresholds_are_strict() {
    let weights = ScoringWeights::default();
    let c = candidate("1", "Brick Tile", "Modern Minimal", "Commercial");

    let at_threshold = TasteVector { modernity: 0.7, rustic: 0.5, warmth: 0.5, luxury: 0.7 };
    assert_eq!(taste_bonus(&c, &at_threshold, &weights), 0.0);

    let above = TasteVector { modernity: 0.71, rustic: 0.5, warmth: 0.5, luxury: 0.71 };
    assert_eq!(taste_bonus(&c, &above, &weights), 35.0);
}

#[test]
fn test_jitter_stays_below_ten() {
    let weights = ScoringWeights::default();
    let prefs = preferences();
    let c = candidate("1", "Roofing Tile", "Heritage", "Commercial");
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..1000 {
        let score = score_candidate(&c, &prefs, &weights, &mut rng);
        assert!((0.0..10.0).contains(&score));
    }
}

#[test]
fn test_dedup_keeps_first_and_drops_missing_urls() {
    let mut a = candidate("a", "Brick Tile", "Rustic", "Residential");
    let mut b = candidate("b", "Brick Tile", "Rustic", "Residential");
    b.image_url = a.image_url.clone();
    let mut c = candidate("c", "Brick Tile", "Rustic", "Residential");
    c.image_url = None;
    a.title = Some("first".to_string());

    let scored: Vec<ScoredCandidate> = [a, b, c]
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| ScoredCandidate { candidate, is_premium: false, score: 10.0 - i as f64 })
        .collect();

    let out = dedup_by_image_url(scored);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].candidate.id, "a");
}

#[test]
fn test_phone_numbers() {
    assert!(is_valid_phone("9876543210"));
    assert!(is_valid_phone("+91-98765-43210"));
    assert!(!is_valid_phone("0123456789"));
    assert!(!is_valid_phone("98765"));
}

#[test]
fn test_high_ticket_score_components() {
    let mut user = OnboardingData {
        role: Some(Role::Architect),
        ..OnboardingData::default()
    };
    assert_eq!(high_ticket_score(&user), 30);

    user.role = Some(Role::PropertyOwner);
    user.project_type = "Commercial".to_string();
    user.lead_time = Some(LeadTime::Immediately);
    user.project_stage = Some(ProjectStage::Execution);
    assert_eq!(high_ticket_score(&user), 60);
}

#[test]
fn test_quiz_clamps_every_dimension() {
    let cards: Vec<_> = (0..15)
        .map(|i| urbanclay_feed::core::QuizCard {
            id: format!("q{}", i),
            style: Some("Modern Minimal".to_string()),
            material: Some("Clay Flooring".to_string()),
            project_type: Some("Residential".to_string()),
        })
        .collect();

    let mut quiz = TasteQuiz::new(cards);
    for i in 0..15 {
        quiz.swipe(&format!("q{}", i), SwipeDirection::Left);
    }

    let taste = quiz.taste();
    assert!(quiz.is_complete());
    assert_eq!(taste.modernity, 0.0);
    assert!((0.0..=1.0).contains(&taste.rustic));
    assert!((0.0..=1.0).contains(&taste.luxury));
}
