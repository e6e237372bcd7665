use crate::models::profile::{Experience, ProfileDraft};
use crate::wizard::sequencer::{PrimaryStep, SubStep, WizardPosition};

/// Minimum number of distinct skills before the skills step may be left.
pub const MIN_SKILLS: usize = 3;

/// Whether forward navigation is allowed from `position`. Evaluated fresh on
/// every call; nothing is cached.
pub fn can_advance(
    position: WizardPosition,
    draft: &ProfileDraft,
    new_experience: &Experience,
) -> bool {
    match position {
        WizardPosition::Primary { step } => match step {
            PrimaryStep::Role => draft
                .experiences
                .first()
                .is_some_and(|e| !e.is_placeholder()),
            PrimaryStep::Skills => draft.distinct_skill_count() >= MIN_SKILLS,
            PrimaryStep::Interests => !draft.interests.trim().is_empty(),
            PrimaryStep::Industry
            | PrimaryStep::Tasks
            | PrimaryStep::Education
            | PrimaryStep::Review => true,
        },
        WizardPosition::AddExperience { sub, .. } => match sub {
            SubStep::Role => !new_experience.is_placeholder(),
            SubStep::Industry | SubStep::Tasks => true,
        },
    }
}
