// Generation facade: the narrow contract between the wizard / career
// endpoints and the content generator.
// All model calls go through llm_client: no direct provider calls here.

pub mod facade;
pub mod fallback;
pub mod prompts;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::career::{CareerPath, CareerProfile};
use crate::models::profile::{Experience, ProfileDraft};
use crate::wizard::suggestions::SuggestionCategory;

pub use facade::LlmGenerationFacade;

/// Supplies suggestion lists and derived text from profile contents.
///
/// Everything except `suggest_career_profile` degrades to static fallback
/// content instead of failing. Whole-profile generation has no meaningful
/// fallback, so its error is surfaced for the caller to retry.
///
/// Carried in `AppState` as `Arc<dyn GenerationFacade>`.
#[async_trait]
pub trait GenerationFacade: Send + Sync {
    async fn suggest_tasks(&self, experiences: &[Experience], excluding: &[String])
        -> Vec<String>;

    async fn suggest_skills(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String>;

    async fn suggest_interests(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String>;

    async fn suggest_statement(&self, profile: &ProfileDraft) -> String;

    async fn suggest_career_profile(&self, profile: &ProfileDraft)
        -> Result<CareerProfile, AppError>;

    async fn suggest_career_detail(&self, base: &CareerPath, profile: &ProfileDraft) -> CareerPath;

    async fn suggest_learning_plan(&self, skill: &str) -> String;

    /// Dispatches to the list operation for `category`.
    async fn suggest(
        &self,
        category: SuggestionCategory,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        match category {
            SuggestionCategory::Tasks => self.suggest_tasks(experiences, excluding).await,
            SuggestionCategory::Skills => self.suggest_skills(experiences, excluding).await,
            SuggestionCategory::Interests => self.suggest_interests(experiences, excluding).await,
        }
    }
}

/// One line per experience: `Role: <role> in Industry: "<industry>".`
pub fn summarise_experiences(experiences: &[Experience], with_tasks: bool) -> String {
    experiences
        .iter()
        .map(|exp| {
            let industry = if exp.industry.trim().is_empty() {
                "N/A"
            } else {
                exp.industry.trim()
            };
            let mut line = format!("Role: {} in Industry: \"{industry}\".", exp.role.trim());
            if with_tasks && !exp.tasks.trim().is_empty() {
                line.push_str(&format!(" Key tasks included: {}.", exp.tasks));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bullet summary of the whole profile for statement / career prompts.
pub fn summarise_profile(profile: &ProfileDraft, with_tasks: bool) -> String {
    let mut lines = vec![
        format!(
            "- Experiences:\n{}",
            summarise_experiences(&profile.experiences, with_tasks)
        ),
        format!("- Stated Skills: {}", profile.skills),
        format!("- Interests/Values: {}", profile.interests),
    ];
    if !profile.education.is_empty() {
        lines.push(format!("- Education: {}", profile.education.join(", ")));
    }
    lines.join("\n")
}
