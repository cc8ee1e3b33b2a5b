use std::collections::HashSet;

use crate::models::{Candidate, PreferenceProfile, ScoredCandidate, TasteVector};

/// Taste dimensions above this count as a strong preference
pub const HIGH_AFFINITY: f64 = 0.7;
/// Modernity below this counts as a preference for traditional styles
pub const LOW_AFFINITY: f64 = 0.3;

pub const MODERN_STYLES: [&str; 2] = ["Modern Minimal", "Contemporary"];
pub const HERITAGE_STYLES: [&str; 2] = ["Rustic", "Heritage"];
pub const RUSTIC_STYLE: &str = "Rustic";
pub const RUSTIC_MATERIAL: &str = "Exposed Brick";

#[inline]
pub fn matches_material(candidate: &Candidate, preferences: &PreferenceProfile) -> bool {
    candidate
        .material
        .as_ref()
        .map(|m| preferences.interested_materials.contains(m))
        .unwrap_or(false)
}

#[inline]
pub fn matches_style(candidate: &Candidate, preferences: &PreferenceProfile) -> bool {
    candidate.style.as_deref() == Some(preferences.architectural_style.as_str())
}

#[inline]
pub fn matches_project_type(candidate: &Candidate, preferences: &PreferenceProfile) -> bool {
    candidate.project_type.as_deref() == Some(preferences.project_type.as_str())
}

#[inline]
fn style_in(candidate: &Candidate, styles: &[&str]) -> bool {
    candidate
        .style
        .as_deref()
        .map(|s| styles.contains(&s))
        .unwrap_or(false)
}

/// Strong modernity and a modern style
#[inline]
pub fn modern_affinity(candidate: &Candidate, taste: &TasteVector) -> bool {
    taste.modernity > HIGH_AFFINITY && style_in(candidate, &MODERN_STYLES)
}

/// Weak modernity and a traditional style
#[inline]
pub fn heritage_affinity(candidate: &Candidate, taste: &TasteVector) -> bool {
    taste.modernity < LOW_AFFINITY && style_in(candidate, &HERITAGE_STYLES)
}

#[inline]
pub fn rustic_affinity(candidate: &Candidate, taste: &TasteVector) -> bool {
    taste.rustic > HIGH_AFFINITY
        && (candidate.style.as_deref() == Some(RUSTIC_STYLE)
            || candidate.material.as_deref() == Some(RUSTIC_MATERIAL))
}

#[inline]
pub fn luxury_affinity(candidate: &Candidate, taste: &TasteVector) -> bool {
    taste.luxury > HIGH_AFFINITY && candidate.is_premium()
}

/// Keep the first occurrence of every image URL, preserving order
///
/// Entries without an image URL are dropped; they cannot be rendered.
pub fn dedup_by_image_url(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(scored.len());

    scored
        .into_iter()
        .filter(|s| match s.candidate.image_url.as_deref() {
            Some(url) if !url.is_empty() => seen.insert(url.to_string()),
            _ => false,
        })
        .collect()
}
