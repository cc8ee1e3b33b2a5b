use crate::models::{LeadSummary, LeadTime, OnboardingData, ProjectStage, Role};

/// Score how likely a user is to place a large order
///
/// Role (architect or builder) 30, commercial project 20, immediate lead
/// time 20, project in execution 20.
pub fn high_ticket_score(user: &OnboardingData) -> u32 {
    let mut score = 0;

    if matches!(user.role, Some(Role::Architect) | Some(Role::Builder)) {
        score += 30;
    }
    if user.project_type == "Commercial" {
        score += 20;
    }
    if user.lead_time == Some(LeadTime::Immediately) {
        score += 20;
    }
    if user.project_stage == Some(ProjectStage::Execution) {
        score += 20;
    }

    score
}

/// Build dashboard rows, hottest leads first
pub fn rank_leads(users: Vec<(String, OnboardingData, usize)>) -> Vec<LeadSummary> {
    let mut leads: Vec<LeadSummary> = users
        .into_iter()
        .map(|(user_id, data, saved_materials)| LeadSummary {
            score: high_ticket_score(&data),
            user_id,
            name: data.name,
            role: data.role,
            business_name: data.business_name,
            location: data.project_location,
            project_type: data.project_type,
            preferred_style: data.architectural_style,
            saved_materials,
        })
        .collect();

    leads.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.saved_materials.cmp(&a.saved_materials))
    });
    leads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score() {
        let user = OnboardingData {
            role: Some(Role::Builder),
            project_type: "Commercial".to_string(),
            lead_time: Some(LeadTime::Immediately),
            project_stage: Some(ProjectStage::Execution),
            ..OnboardingData::default()
        };
        assert_eq!(high_ticket_score(&user), 90);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        assert_eq!(high_ticket_score(&OnboardingData::default()), 0);
    }

    #[test]
    fn test_rank_leads_orders_by_score() {
        let cold = OnboardingData {
            name: "Cold".to_string(),
            role: Some(Role::Contractor),
            ..OnboardingData::default()
        };
        let hot = OnboardingData {
            name: "Hot".to_string(),
            role: Some(Role::Architect),
            project_type: "Commercial".to_string(),
            ..OnboardingData::default()
        };

        let leads = rank_leads(vec![
            ("u1".to_string(), cold, 10),
            ("u2".to_string(), hot, 0),
        ]);

        assert_eq!(leads[0].name, "Hot");
        assert_eq!(leads[0].score, 50);
        assert_eq!(leads[1].saved_materials, 10);
    }
}
