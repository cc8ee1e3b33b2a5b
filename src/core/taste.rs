//! Swipe quiz that turns yes/no reactions into a taste vector

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::filters::{HERITAGE_STYLES, MODERN_STYLES, RUSTIC_MATERIAL, RUSTIC_STYLE};
use crate::models::{TasteVector, PREMIUM_PROJECT_TYPES};

/// How far a single swipe moves a dimension
pub const SWIPE_STEP: f64 = 0.1;

const WARM_MATERIALS: [&str; 3] = ["Exposed Brick", "Terracotta Jali", "Brick Pavers"];

/// Card shown in the quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCard {
    pub id: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(rename = "projectType", default)]
    pub project_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    #[serde(rename = "cardId")]
    pub card_id: String,
    pub direction: SwipeDirection,
}

/// Per-dimension signal of a card: +1 pulls toward the dimension, -1 away
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Signal {
    modernity: f64,
    rustic: f64,
    warmth: f64,
    luxury: f64,
}

fn signal(card: &QuizCard) -> Signal {
    let style = card.style.as_deref().unwrap_or_default();
    let material = card.material.as_deref().unwrap_or_default();
    let mut s = Signal::default();

    if MODERN_STYLES.contains(&style) {
        s.modernity = 1.0;
    } else if HERITAGE_STYLES.contains(&style) {
        s.modernity = -1.0;
    }
    if style == RUSTIC_STYLE || material == RUSTIC_MATERIAL {
        s.rustic = 1.0;
    }
    if WARM_MATERIALS.contains(&material) {
        s.warmth = 1.0;
    }
    if card
        .project_type
        .as_deref()
        .map(|t| PREMIUM_PROJECT_TYPES.contains(&t))
        .unwrap_or(false)
    {
        s.luxury = 1.0;
    }

    s
}

/// One pass through the quiz deck
#[derive(Debug, Clone)]
pub struct TasteQuiz {
    cards: HashMap<String, QuizCard>,
    remaining: usize,
    taste: TasteVector,
}

impl TasteQuiz {
    pub fn new(cards: Vec<QuizCard>) -> Self {
        let cards: HashMap<String, QuizCard> =
            cards.into_iter().map(|c| (c.id.clone(), c)).collect();
        let remaining = cards.len();

        Self {
            cards,
            remaining,
            taste: TasteVector { luxury: 0.5, ..TasteVector::default() },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn taste(&self) -> TasteVector {
        self.taste
    }

    /// Apply a swipe; unknown or repeated cards are ignored
    pub fn swipe(&mut self, card_id: &str, direction: SwipeDirection) -> bool {
        let Some(card) = self.cards.remove(card_id) else {
            tracing::debug!("Ignoring swipe on unknown card {}", card_id);
            return false;
        };
        self.remaining -= 1;

        let sign = match direction {
            SwipeDirection::Right => 1.0,
            SwipeDirection::Left => -1.0,
        };
        let s = signal(&card);
        let nudge = |value: f64, weight: f64| (value + sign * weight * SWIPE_STEP).clamp(0.0, 1.0);

        self.taste = TasteVector {
            modernity: nudge(self.taste.modernity, s.modernity),
            rustic: nudge(self.taste.rustic, s.rustic),
            warmth: nudge(self.taste.warmth, s.warmth),
            luxury: nudge(self.taste.luxury, s.luxury),
        };

        true
    }

    /// Run a full list of swipes and return the resulting vector
    pub fn score(cards: Vec<QuizCard>, swipes: &[Swipe]) -> TasteVector {
        let mut quiz = Self::new(cards);
        for swipe in swipes {
            quiz.swipe(&swipe.card_id, swipe.direction);
        }
        quiz.taste()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, style: &str, material: &str, project_type: &str) -> QuizCard {
        QuizCard {
            id: id.to_string(),
            style: Some(style.to_string()),
            material: Some(material.to_string()),
            project_type: Some(project_type.to_string()),
        }
    }

    #[test]
    fn test_starts_neutral() {
        let quiz = TasteQuiz::new(vec![card("1", "Rustic", "Exposed Brick", "Residential")]);
        let taste = quiz.taste();

        assert_eq!(taste.modernity, 0.5);
        assert_eq!(taste.luxury, 0.5);
        assert!(!quiz.is_complete());
    }

    #[test]
    fn test_right_swipe_on_modern_card() {
        let mut quiz = TasteQuiz::new(vec![card("1", "Modern Minimal", "Brick Tile", "Commercial")]);
        assert!(quiz.swipe("1", SwipeDirection::Right));

        let taste = quiz.taste();
        assert!((taste.modernity - 0.6).abs() < 1e-9);
        assert!((taste.luxury - 0.6).abs() < 1e-9);
        assert_eq!(taste.rustic, 0.5);
        assert!(quiz.is_complete());
    }

    #[test]
    fn test_left_swipe_on_heritage_card_raises_modernity() {
        let mut quiz = TasteQuiz::new(vec![card("1", "Heritage", "Brick Pavers", "Residential")]);
        quiz.swipe("1", SwipeDirection::Left);

        let taste = quiz.taste();
        assert!((taste.modernity - 0.6).abs() < 1e-9);
        assert!((taste.warmth - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_swipe_ignored() {
        let mut quiz = TasteQuiz::new(vec![card("1", "Rustic", "Exposed Brick", "Residential")]);
        assert!(quiz.swipe("1", SwipeDirection::Right));
        assert!(!quiz.swipe("1", SwipeDirection::Right));
        assert!(!quiz.swipe("missing", SwipeDirection::Right));
    }

    #[test]
    fn test_dimensions_stay_in_range() {
        let cards: Vec<QuizCard> = (0..20)
            .map(|i| card(&i.to_string(), "Rustic", "Exposed Brick", "Industrial"))
            .collect();
        let swipes: Vec<Swipe> = (0..20)
            .map(|i| Swipe { card_id: i.to_string(), direction: SwipeDirection::Right })
            .collect();

        let taste = TasteQuiz::score(cards, &swipes);
        assert_eq!(taste.rustic, 1.0);
        assert_eq!(taste.modernity, 0.0);
        assert_eq!(taste.luxury, 1.0);
    }
}
