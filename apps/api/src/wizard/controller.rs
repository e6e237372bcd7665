//! Wizard Controller: orchestrates the sequencer, validation gate, suggestion
//! caches and profile draft.
//!
//! The controller is synchronous. Anything that needs the generation facade is
//! returned as a `GenerationRequest`; the caller runs it without holding the
//! controller and hands the result back through `complete`. Results arriving
//! after the session was closed, after finalize, or for a cache that has been
//! reset since are dropped.

use std::slice;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::profile::{canonicalize, split_items, Experience, ProfileDraft};
use crate::wizard::education::{EducationEntry, EducationScratch};
use crate::wizard::sequencer::{
    Direction, PrimaryStep, StepSequencer, SubStep, Transition, WizardPosition,
};
use crate::wizard::suggestions::{
    CacheSlot, FetchKind, FetchTicket, PrimarySuggestions, SuggestionCache, SuggestionCategory,
};
use crate::wizard::validation::can_advance;
use crate::wizard::{Outcome, WizardAction, WizardError, WizardObserver};

/// A request for the generation facade.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Suggestions(FetchTicket),
    Statement(StatementTicket),
}

/// A facade response for an earlier request.
#[derive(Debug, Clone)]
pub enum GenerationResult {
    Suggestions(FetchTicket, Vec<String>),
    Statement(StatementTicket, String),
}

#[derive(Debug, Clone)]
pub struct StatementTicket {
    pub profile: ProfileDraft,
    seq: u64,
}

/// The review step's personal statement. Only the latest request may apply.
#[derive(Debug, Default)]
struct StatementState {
    text: Option<String>,
    is_loading: bool,
    requested_for: Option<ProfileDraft>,
    seq: u64,
}

/// Result of one `apply` call.
#[derive(Debug, Default)]
pub struct ActionEffect {
    pub outcome: Option<Outcome>,
    pub requests: Vec<GenerationRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub chips: Vec<String>,
    pub selected: Vec<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementView {
    pub text: Option<String>,
    pub is_loading: bool,
}

/// Everything a client needs to render the current step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub position: WizardPosition,
    pub direction: Direction,
    pub step_position: usize,
    pub step_label: &'static str,
    pub can_advance: bool,
    pub finalized: bool,
    pub draft: ProfileDraft,
    pub new_experience: Experience,
    pub education_scratch: EducationScratch,
    pub education_entries: Vec<EducationEntry>,
    pub tasks: CategoryView,
    pub skills: CategoryView,
    pub interests: CategoryView,
    pub sub_flow_tasks: CategoryView,
    pub statement: StatementView,
}

pub struct WizardController {
    draft: ProfileDraft,
    sequencer: StepSequencer,
    new_experience: Experience,
    education: EducationScratch,
    suggestions: PrimarySuggestions,
    sub_flow_tasks: SuggestionCache,
    statement: StatementState,
    observer: Arc<dyn WizardObserver>,
    mounted: bool,
    finalized: bool,
}

impl WizardController {
    /// Starts a wizard, optionally hydrated from a previously completed draft.
    pub fn new(
        initial: Option<ProfileDraft>,
        start: PrimaryStep,
        observer: Arc<dyn WizardObserver>,
    ) -> Self {
        let mut draft = initial.unwrap_or_default();
        if draft.experiences.is_empty() {
            draft.experiences.push(Experience::default());
        }
        Self {
            draft,
            sequencer: StepSequencer::new(start),
            new_experience: Experience::default(),
            education: EducationScratch::default(),
            suggestions: PrimarySuggestions::default(),
            sub_flow_tasks: SuggestionCache::default(),
            statement: StatementState::default(),
            observer,
            mounted: true,
            finalized: false,
        }
    }

    pub fn position(&self) -> WizardPosition {
        self.sequencer.position()
    }

    #[cfg(test)]
    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    #[cfg(test)]
    pub fn new_experience(&self) -> &Experience {
        &self.new_experience
    }

    #[cfg(test)]
    pub fn suggestions(&self, category: SuggestionCategory) -> &SuggestionCache {
        self.suggestions.get(category)
    }

    #[cfg(test)]
    pub fn sub_flow_tasks(&self) -> &SuggestionCache {
        &self.sub_flow_tasks
    }

    #[cfg(test)]
    pub fn statement(&self) -> Option<&str> {
        self.statement.text.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.position(), &self.draft, &self.new_experience)
    }

    /// Applies one action, then collects whatever fetches are now due.
    pub fn apply(&mut self, action: WizardAction) -> Result<ActionEffect, WizardError> {
        self.ensure_active()?;
        let mut effect = ActionEffect::default();

        match action {
            WizardAction::SetRole { value } => self.active_experience_mut().role = value,
            WizardAction::SetIndustry { value } => self.active_experience_mut().industry = value,
            WizardAction::ToggleTask { task } => self.active_experience_mut().toggle_task(&task),
            WizardAction::ToggleSkill { skill } => self.draft.toggle_skill(&skill),
            WizardAction::ToggleInterest { interest } => self.draft.toggle_interest(&interest),
            WizardAction::AddCustom { value } => self.add_custom(&value)?,
            WizardAction::SetSkillsText { value } => self.draft.skills = canonicalize(&value),
            WizardAction::SetInterestsText { value } => {
                self.draft.interests = canonicalize(&value)
            }
            WizardAction::ChooseEducationLevel { level } => self.education.choose_level(&level),
            WizardAction::SetEducationCustomLevel { value } => {
                self.education.set_custom_level(&value)
            }
            WizardAction::SetEducationSubject { value } => self.education.set_subject(&value),
            WizardAction::RemoveExperience { index } => self.remove_experience(index)?,
            WizardAction::RemoveEducation { index } => self.remove_education(index)?,
            WizardAction::RemoveSkill { skill } => {
                self.ensure_review()?;
                self.draft.remove_skill(&skill);
            }
            WizardAction::RemoveInterest { interest } => {
                self.ensure_review()?;
                self.draft.remove_interest(&interest);
            }
            WizardAction::Advance => effect.outcome = Some(self.advance()),
            WizardAction::Retreat => effect.outcome = Some(self.retreat()),
            WizardAction::EnterSubFlow => {
                self.enter_sub_flow()?;
                effect.outcome = Some(Outcome::Moved);
            }
            WizardAction::AddEducation => {
                self.education.clear();
                self.jump_to(PrimaryStep::Education.index())?;
                effect.outcome = Some(Outcome::Moved);
            }
            WizardAction::JumpTo { step } => {
                self.jump_to(step)?;
                effect.outcome = Some(Outcome::Moved);
            }
            WizardAction::Regenerate => effect.requests.extend(self.regenerate()),
            WizardAction::RefreshStatement => {
                effect.requests.extend(self.begin_statement(true))
            }
        }

        effect.requests.extend(self.due_requests());
        Ok(effect)
    }

    /// Forward navigation through the validation gate.
    pub fn advance(&mut self) -> Outcome {
        if !self.can_advance() {
            return Outcome::Blocked;
        }
        if self.position() == (WizardPosition::Primary { step: PrimaryStep::Education }) {
            if let Some(entry) = self.education.compose() {
                self.draft.education.push(entry);
            }
            self.education.clear();
        }
        let transition = self.sequencer.advance();
        self.settle(transition)
    }

    pub fn retreat(&mut self) -> Outcome {
        let transition = self.sequencer.retreat();
        self.settle(transition)
    }

    /// "Experience +": starts the nested flow with a fresh scratch experience.
    pub fn enter_sub_flow(&mut self) -> Result<(), WizardError> {
        self.sequencer.enter_sub_flow()?;
        self.new_experience = Experience::default();
        self.sub_flow_tasks.reset();
        Ok(())
    }

    /// Edit shortcut from the review step. Earlier steps' gates are not re-checked.
    pub fn jump_to(&mut self, index: usize) -> Result<(), WizardError> {
        let step = PrimaryStep::from_index(index).ok_or(WizardError::StepOutOfRange(index))?;
        self.sequencer.jump_to(step)?;
        self.observer.on_step_position_change(step.index());
        Ok(())
    }

    /// Fetches that the current step needs and has not yet issued.
    pub fn due_requests(&mut self) -> Vec<GenerationRequest> {
        if !self.mounted || self.finalized {
            return Vec::new();
        }
        let request = match self.position() {
            WizardPosition::Primary { step } => match step_category(step) {
                Some(category) => self
                    .suggestions
                    .get_mut(category)
                    .begin(
                        CacheSlot::Primary(category),
                        FetchKind::Initial,
                        &self.draft.experiences,
                    )
                    .map(GenerationRequest::Suggestions),
                None if step == PrimaryStep::Review => self.begin_statement(false),
                None => None,
            },
            WizardPosition::AddExperience {
                sub: SubStep::Tasks,
                ..
            } => self
                .sub_flow_tasks
                .begin(
                    CacheSlot::SubFlowTasks,
                    FetchKind::Initial,
                    slice::from_ref(&self.new_experience),
                )
                .map(GenerationRequest::Suggestions),
            WizardPosition::AddExperience { .. } => None,
        };
        request.into_iter().collect()
    }

    /// Applies a facade result. Returns false when it was stale and dropped.
    pub fn complete(&mut self, result: GenerationResult) -> bool {
        if !self.mounted || self.finalized {
            debug!("discarding generation result for an inactive wizard");
            return false;
        }
        match result {
            GenerationResult::Suggestions(ticket, items) => {
                let cache = match ticket.slot {
                    CacheSlot::Primary(category) => self.suggestions.get_mut(category),
                    CacheSlot::SubFlowTasks => &mut self.sub_flow_tasks,
                };
                cache.complete(&ticket, items)
            }
            GenerationResult::Statement(ticket, text) => {
                if ticket.seq != self.statement.seq {
                    debug!("discarding superseded statement");
                    return false;
                }
                self.statement.text = Some(text);
                self.statement.is_loading = false;
                true
            }
        }
    }

    /// The wizard is going away; pending results must not be applied.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn view(&self) -> WizardView {
        let position = self.position();
        let primary_tasks = self
            .draft
            .experiences
            .first()
            .map(|e| e.tasks.as_str())
            .unwrap_or("");
        WizardView {
            position,
            direction: self.sequencer.direction(),
            step_position: position.primary_step().index(),
            step_label: position.primary_step().label(),
            can_advance: self.can_advance(),
            finalized: self.finalized,
            draft: self.draft.clone(),
            new_experience: self.new_experience.clone(),
            education_scratch: self.education.clone(),
            education_entries: self
                .draft
                .education
                .iter()
                .map(|e| EducationEntry::parse(e))
                .collect(),
            tasks: category_view(&self.suggestions.tasks, primary_tasks),
            skills: category_view(&self.suggestions.skills, &self.draft.skills),
            interests: category_view(&self.suggestions.interests, &self.draft.interests),
            sub_flow_tasks: category_view(&self.sub_flow_tasks, &self.new_experience.tasks),
            statement: StatementView {
                text: self.statement.text.clone(),
                is_loading: self.statement.is_loading,
            },
        }
    }

    fn ensure_active(&self) -> Result<(), WizardError> {
        if !self.mounted {
            return Err(WizardError::Unmounted);
        }
        if self.finalized {
            return Err(WizardError::Finalized);
        }
        Ok(())
    }

    fn ensure_review(&self) -> Result<(), WizardError> {
        match self.position() {
            WizardPosition::Primary {
                step: PrimaryStep::Review,
            } => Ok(()),
            _ => Err(WizardError::ReviewOnly),
        }
    }

    /// The experience the role/industry/tasks inputs edit: the scratch one in
    /// the sub-flow, otherwise the first experience.
    fn active_experience_mut(&mut self) -> &mut Experience {
        if self.position().is_sub_flow() {
            return &mut self.new_experience;
        }
        if self.draft.experiences.is_empty() {
            self.draft.experiences.push(Experience::default());
        }
        &mut self.draft.experiences[0]
    }

    fn add_custom(&mut self, value: &str) -> Result<(), WizardError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        match self.position() {
            WizardPosition::Primary {
                step: PrimaryStep::Tasks,
            }
            | WizardPosition::AddExperience {
                sub: SubStep::Tasks,
                ..
            } => self.active_experience_mut().toggle_task(value),
            WizardPosition::Primary {
                step: PrimaryStep::Skills,
            } => self.draft.toggle_skill(value),
            WizardPosition::Primary {
                step: PrimaryStep::Interests,
            } => self.draft.toggle_interest(value),
            _ => return Err(WizardError::NoCustomEntryHere),
        }
        Ok(())
    }

    fn remove_experience(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_review()?;
        if index >= self.draft.experiences.len() {
            return Err(WizardError::IndexOutOfRange {
                what: "experience",
                index,
            });
        }
        self.draft.experiences.remove(index);
        Ok(())
    }

    fn remove_education(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_review()?;
        if index >= self.draft.education.len() {
            return Err(WizardError::IndexOutOfRange {
                what: "education entry",
                index,
            });
        }
        self.draft.education.remove(index);
        Ok(())
    }

    fn regenerate(&mut self) -> Option<GenerationRequest> {
        match self.position() {
            WizardPosition::Primary {
                step: PrimaryStep::Review,
            } => self.begin_statement(true),
            WizardPosition::Primary { step } => {
                let category = step_category(step)?;
                self.suggestions
                    .get_mut(category)
                    .begin(
                        CacheSlot::Primary(category),
                        FetchKind::Regenerate,
                        &self.draft.experiences,
                    )
                    .map(GenerationRequest::Suggestions)
            }
            WizardPosition::AddExperience {
                sub: SubStep::Tasks,
                ..
            } => self
                .sub_flow_tasks
                .begin(
                    CacheSlot::SubFlowTasks,
                    FetchKind::Regenerate,
                    slice::from_ref(&self.new_experience),
                )
                .map(GenerationRequest::Suggestions),
            WizardPosition::AddExperience { .. } => None,
        }
    }

    /// Requests a statement on the review step when the profile changed since
    /// the last request, or unconditionally when `force` is set.
    fn begin_statement(&mut self, force: bool) -> Option<GenerationRequest> {
        if self.position()
            != (WizardPosition::Primary {
                step: PrimaryStep::Review,
            })
        {
            return None;
        }
        let profile = self.draft.finalized();
        if !profile.has_content() {
            return None;
        }
        if !force && self.statement.requested_for.as_ref() == Some(&profile) {
            return None;
        }
        self.statement.seq += 1;
        self.statement.is_loading = true;
        self.statement.requested_for = Some(profile.clone());
        Some(GenerationRequest::Statement(StatementTicket {
            profile,
            seq: self.statement.seq,
        }))
    }

    fn settle(&mut self, transition: Transition) -> Outcome {
        match transition {
            Transition::Moved => {
                if let WizardPosition::Primary { step } = self.position() {
                    self.observer.on_step_position_change(step.index());
                }
                Outcome::Moved
            }
            Transition::Exit => Outcome::Exited,
            Transition::Finalize => {
                self.finalized = true;
                let profile = self.draft.finalized();
                info!(
                    experiences = profile.experiences.len(),
                    education = profile.education.len(),
                    "Wizard finalized"
                );
                self.observer.on_complete(&profile);
                Outcome::Finalized { profile }
            }
            Transition::SubFlowCompleted => {
                let new_experience = std::mem::take(&mut self.new_experience);
                let appended = !new_experience.is_placeholder();
                if appended {
                    self.draft.experiences.retain(|e| !e.is_placeholder());
                    self.draft.experiences.push(new_experience);
                }
                // Dependent suggestions must be re-derived from the full experience list.
                self.suggestions.reset_all();
                self.sub_flow_tasks.reset();
                info!(appended, "Add-experience flow completed");
                Outcome::SubFlowCommitted { appended }
            }
            Transition::SubFlowCancelled => {
                self.new_experience = Experience::default();
                self.sub_flow_tasks.reset();
                Outcome::SubFlowCancelled
            }
        }
    }
}

fn step_category(step: PrimaryStep) -> Option<SuggestionCategory> {
    match step {
        PrimaryStep::Tasks => Some(SuggestionCategory::Tasks),
        PrimaryStep::Skills => Some(SuggestionCategory::Skills),
        PrimaryStep::Interests => Some(SuggestionCategory::Interests),
        _ => None,
    }
}

fn category_view(cache: &SuggestionCache, selected: &str) -> CategoryView {
    CategoryView {
        chips: cache.chips(selected),
        selected: split_items(selected).into_iter().map(String::from).collect(),
        is_loading: cache.is_loading(),
    }
}
