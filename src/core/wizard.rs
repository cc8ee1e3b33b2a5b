//! Onboarding wizard state machine
//!
//! Steps run linearly except for the current-project step, which is skipped
//! when the user is not working on a project.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{OnboardingData, TasteVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Identity,
    Profile,
    Project,
    Materials,
    Style,
    TasteQuiz,
    Complete,
}

impl WizardStep {
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Identity,
            1 => Self::Profile,
            2 => Self::Project,
            3 => Self::Materials,
            4 => Self::Style,
            5 => Self::TasteQuiz,
            _ => Self::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Step {step:?} is incomplete: {reason}")]
    Incomplete { step: WizardStep, reason: String },

    #[error("The taste quiz must be finished to continue")]
    QuizPending,

    #[error("Onboarding is already complete")]
    AlreadyComplete,
}

/// Wizard position plus the answers collected so far
#[derive(Debug, Clone, Default)]
pub struct OnboardingWizard {
    step: usize,
    data: OnboardingData,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::from_index(self.step)
    }

    pub fn data(&self) -> &OnboardingData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut OnboardingData {
        &mut self.data
    }

    pub fn into_data(self) -> OnboardingData {
        self.data
    }

    /// Advance one step if the current one is valid
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        match self.step() {
            WizardStep::Complete => return Err(WizardError::AlreadyComplete),
            WizardStep::TasteQuiz => return Err(WizardError::QuizPending),
            step => validate_step(step, &self.data)?,
        }

        self.step += 1;
        if self.step() == WizardStep::Project && !self.data.working_on_project {
            self.step += 1;
        }

        Ok(self.step())
    }

    /// Go back one step; never leaves the first step
    pub fn back(&mut self) -> WizardStep {
        if self.step() == WizardStep::Complete {
            return WizardStep::Complete;
        }

        self.step = self.step.saturating_sub(1);
        if self.step() == WizardStep::Project && !self.data.working_on_project {
            self.step -= 1;
        }

        self.step()
    }

    /// Finish the quiz step with the resulting taste vector
    pub fn complete(&mut self, taste: TasteVector) -> Result<&OnboardingData, WizardError> {
        match self.step() {
            WizardStep::TasteQuiz => {
                self.data.taste_vector = Some(taste.normalized());
                self.step = WizardStep::Complete.index();
                Ok(&self.data)
            }
            WizardStep::Complete => Err(WizardError::AlreadyComplete),
            step => Err(WizardError::Incomplete {
                step,
                reason: "earlier steps are not finished".to_string(),
            }),
        }
    }

    /// Walk the whole wizard for a submission made in one piece
    pub fn replay(data: OnboardingData) -> Result<OnboardingData, WizardError> {
        let taste = data.taste_vector.unwrap_or_default();
        let mut wizard = Self { step: 0, data };

        while wizard.step() != WizardStep::TasteQuiz {
            wizard.next()?;
        }
        wizard.complete(taste)?;

        Ok(wizard.into_data())
    }
}

/// Check whether the answers allow leaving `step`
pub fn validate_step(step: WizardStep, data: &OnboardingData) -> Result<(), WizardError> {
    let fail = |reason: &str| {
        Err(WizardError::Incomplete {
            step,
            reason: reason.to_string(),
        })
    };

    match step {
        WizardStep::Identity => {
            if data.name.trim().chars().count() < 2 {
                return fail("name must have at least 2 characters");
            }
            if !is_valid_phone(&data.phone_number) {
                return fail("phone number is not a valid mobile number");
            }
            Ok(())
        }
        WizardStep::Profile => {
            if data.role.is_none() {
                return fail("role is required");
            }
            Ok(())
        }
        WizardStep::Project => {
            if data.project_location.trim().chars().count() < 2 {
                return fail("project location must have at least 2 characters");
            }
            if data.project_stage.is_none() {
                return fail("project stage is required");
            }
            if data.lead_time.is_none() {
                return fail("lead time is required");
            }
            Ok(())
        }
        WizardStep::Materials => {
            if data.interested_materials.is_empty() {
                return fail("select at least one material");
            }
            Ok(())
        }
        WizardStep::Style => {
            if data.color_preference.is_empty()
                || data.architectural_style.is_empty()
                || data.project_type.is_empty()
            {
                return fail("color, style and project type are required");
            }
            Ok(())
        }
        WizardStep::TasteQuiz => Err(WizardError::QuizPending),
        WizardStep::Complete => Ok(()),
    }
}

/// 10 digits starting 6-9, or 12 digits starting with the 91 country code
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        10 => matches!(digits.as_bytes()[0], b'6'..=b'9'),
        12 => digits.starts_with("91"),
        _ => false,
    }
}
