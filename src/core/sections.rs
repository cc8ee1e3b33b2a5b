use crate::models::{FeedItem, FeedSection, OnboardingData, ScoredCandidate, SectionLayout};

/// Items in the "Curated for your Project" grid
const CURATED_SIZE: usize = 12;
/// Items in the material carousel
const MATERIAL_SIZE: usize = 10;

/// Group a ranked feed into the discover page sections
///
/// `favorites` are the latest catalog additions and fill the third section.
pub fn build_sections(
    user: &OnboardingData,
    ranked: &[ScoredCandidate],
    favorites: Vec<FeedItem>,
) -> Vec<FeedSection> {
    let style = non_empty(&user.architectural_style, "Modern Minimal");
    let location = non_empty(&user.project_location, "Urban Context");
    let material = user
        .interested_materials
        .first()
        .map(String::as_str)
        .unwrap_or("Clay");

    let curated: Vec<FeedItem> = ranked
        .iter()
        .take(CURATED_SIZE)
        .map(FeedItem::from)
        .collect();

    // Material section skips what the curated grid already shows
    let material_items: Vec<FeedItem> = ranked
        .iter()
        .skip(CURATED_SIZE)
        .filter(|s| s.candidate.material.as_deref() == Some(material))
        .take(MATERIAL_SIZE)
        .map(FeedItem::from)
        .collect();

    vec![
        FeedSection {
            id: "section-1".to_string(),
            title: "Curated for your Project".to_string(),
            subtitle: Some(format!("Selected for your {} taste in {}", style, location)),
            layout: SectionLayout::Grid,
            items: curated,
        },
        FeedSection {
            id: "section-2".to_string(),
            title: "Material Expressions".to_string(),
            subtitle: Some(format!("Matching your interest in {}", material)),
            layout: SectionLayout::Carousel,
            items: material_items,
        },
        FeedSection {
            id: "section-3".to_string(),
            title: "Architect-Selected Favorites".to_string(),
            subtitle: Some(format!("Trending in {}", location)),
            layout: SectionLayout::Grid,
            items: favorites,
        },
    ]
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;

    fn scored(id: usize, material: &str) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                id: id.to_string(),
                title: None,
                image_url: Some(format!("https://cdn.test/{}.jpg", id)),
                material: Some(material.to_string()),
                style: Some("Rustic".to_string()),
                project_type: None,
            },
            is_premium: false,
            score: 100.0 - id as f64,
        }
    }

    #[test]
    fn test_subtitles_fall_back() {
        let sections = build_sections(&OnboardingData::default(), &[], vec![]);

        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[0].subtitle.as_deref(),
            Some("Selected for your Modern Minimal taste in Urban Context")
        );
        assert_eq!(sections[1].subtitle.as_deref(), Some("Matching your interest in Clay"));
        assert_eq!(sections[1].layout, SectionLayout::Carousel);
    }

    #[test]
    fn test_material_section_does_not_repeat_curated() {
        let user = OnboardingData {
            interested_materials: vec!["Brick Tile".to_string()],
            ..OnboardingData::default()
        };
        let ranked: Vec<ScoredCandidate> = (0..30).map(|i| scored(i, "Brick Tile")).collect();

        let sections = build_sections(&user, &ranked, vec![]);

        assert_eq!(sections[0].items.len(), CURATED_SIZE);
        assert_eq!(sections[1].items.len(), MATERIAL_SIZE);
        assert!(sections[1]
            .items
            .iter()
            .all(|item| !sections[0].items.iter().any(|c| c.id == item.id)));
    }
}
