// Profile-collection wizard: step sequencing, validation gates, suggestion
// caches and the controller that ties them to the profile draft.
// Sessions are in-memory only and hosted over HTTP by `handlers`.

pub mod controller;
pub mod education;
pub mod handlers;
pub mod sequencer;
pub mod session;
pub mod suggestions;
pub mod validation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::ProfileDraft;

/// Misuse of the wizard by the client. Validation blocks are not errors;
/// they come back as `Outcome::Blocked`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("the wizard has already been completed")]
    Finalized,

    #[error("the wizard session has been closed")]
    Unmounted,

    #[error("this action is only available in the primary flow")]
    NotInPrimaryFlow,

    #[error("already adding an experience")]
    AlreadyInSubFlow,

    #[error("this action is only available on the review step")]
    ReviewOnly,

    #[error("step {0} does not exist")]
    StepOutOfRange(usize),

    #[error("no {what} at index {index}")]
    IndexOutOfRange { what: &'static str, index: usize },

    #[error("custom entries are not accepted on this step")]
    NoCustomEntryHere,
}

/// A single user interaction, as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardAction {
    SetRole { value: String },
    SetIndustry { value: String },
    ToggleTask { task: String },
    ToggleSkill { skill: String },
    ToggleInterest { interest: String },
    /// Free-text entry routed through the toggle of the active step's category.
    AddCustom { value: String },
    SetSkillsText { value: String },
    SetInterestsText { value: String },
    ChooseEducationLevel { level: String },
    SetEducationCustomLevel { value: String },
    SetEducationSubject { value: String },
    RemoveExperience { index: usize },
    RemoveEducation { index: usize },
    RemoveSkill { skill: String },
    RemoveInterest { interest: String },
    Advance,
    Retreat,
    EnterSubFlow,
    /// "Education +" on the review step: clear the scratch and jump to education.
    AddEducation,
    JumpTo { step: usize },
    Regenerate,
    RefreshStatement,
}

/// What a navigation action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Moved,
    /// The current step's gate is closed; nothing changed.
    Blocked,
    /// Back from the first step: the caller should leave the wizard.
    Exited,
    SubFlowCommitted { appended: bool },
    SubFlowCancelled,
    /// Terminal: the caller now owns the profile.
    Finalized { profile: ProfileDraft },
}

/// Notified of wizard events the surrounding application cares about.
pub trait WizardObserver: Send + Sync {
    /// Every primary-step transition, for progress indicators.
    fn on_step_position_change(&self, _index: usize) {}

    /// Exactly once, at finalize.
    fn on_complete(&self, _profile: &ProfileDraft) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl WizardObserver for NoopObserver {}
