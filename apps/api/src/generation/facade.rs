//! `GenerationFacade` backed by the LLM client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::*;
use crate::generation::{fallback, summarise_experiences, summarise_profile, GenerationFacade};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, MARKDOWN_SYSTEM, UK_MARKET_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::career::{CareerPath, CareerProfile};
use crate::models::profile::{Experience, ProfileDraft};
use crate::wizard::suggestions::SuggestionCategory;

#[derive(Debug, Deserialize)]
struct StatementReply {
    statement: String,
}

#[derive(Debug, Deserialize)]
struct CareerDetailReply {
    description: String,
    required_skills: Vec<String>,
    salary_range: String,
    market_demand: String,
    #[serde(default)]
    certifications: Vec<String>,
    experience_needed: String,
}

#[derive(Clone)]
pub struct LlmGenerationFacade {
    llm: LlmClient,
}

impl LlmGenerationFacade {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn suggest_list(
        &self,
        category: SuggestionCategory,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        let prompt = list_prompt(category, experiences, excluding);
        let temperature = match category {
            SuggestionCategory::Tasks => TASKS_TEMPERATURE,
            SuggestionCategory::Skills => SKILLS_TEMPERATURE,
            SuggestionCategory::Interests => INTERESTS_TEMPERATURE,
        };

        match self
            .llm
            .call_json::<Vec<String>>(&prompt, JSON_ONLY_SYSTEM, temperature)
            .await
        {
            Ok(items) => {
                let items = clean_items(items);
                if items.is_empty() {
                    warn!(?category, "generator returned no usable suggestions, using fallback");
                    fallback_list(category)
                } else {
                    items
                }
            }
            Err(e) => {
                warn!(?category, "suggestion generation failed, using fallback: {e}");
                fallback_list(category)
            }
        }
    }
}

#[async_trait]
impl GenerationFacade for LlmGenerationFacade {
    async fn suggest_tasks(&self, experiences: &[Experience], excluding: &[String]) -> Vec<String> {
        self.suggest_list(SuggestionCategory::Tasks, experiences, excluding)
            .await
    }

    async fn suggest_skills(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        self.suggest_list(SuggestionCategory::Skills, experiences, excluding)
            .await
    }

    async fn suggest_interests(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        self.suggest_list(SuggestionCategory::Interests, experiences, excluding)
            .await
    }

    async fn suggest_statement(&self, profile: &ProfileDraft) -> String {
        let prompt = STATEMENT_PROMPT_TEMPLATE.replace("{profile}", &summarise_profile(profile, true));
        match self
            .llm
            .call_json::<StatementReply>(&prompt, JSON_ONLY_SYSTEM, STATEMENT_TEMPERATURE)
            .await
        {
            Ok(reply) if !reply.statement.trim().is_empty() => reply.statement.trim().to_string(),
            Ok(_) => {
                warn!("statement generation returned blank text, using fallback");
                fallback::STATEMENT.to_string()
            }
            Err(e) => {
                warn!("statement generation failed, using fallback: {e}");
                fallback::STATEMENT.to_string()
            }
        }
    }

    async fn suggest_career_profile(
        &self,
        profile: &ProfileDraft,
    ) -> Result<CareerProfile, AppError> {
        let prompt = CAREER_PROFILE_PROMPT_TEMPLATE
            .replace("{profile}", &summarise_profile(profile, true))
            .replace("{uk_market}", UK_MARKET_INSTRUCTION);

        let career = self
            .llm
            .call_json::<CareerProfile>(&prompt, JSON_ONLY_SYSTEM, CAREER_PROFILE_TEMPERATURE)
            .await?;

        if career.paths.is_empty() {
            return Err(AppError::ProfileGeneration(LlmError::EmptyContent));
        }
        info!("Generated career profile with {} paths", career.paths.len());
        Ok(career)
    }

    async fn suggest_career_detail(&self, base: &CareerPath, profile: &ProfileDraft) -> CareerPath {
        let prompt = CAREER_DETAIL_PROMPT_TEMPLATE
            .replace("{title}", &base.title)
            .replace("{industry}", &base.industry)
            .replace("{profile}", &summarise_profile(profile, false))
            .replace("{uk_market}", UK_MARKET_INSTRUCTION);

        match self
            .llm
            .call_json::<CareerDetailReply>(&prompt, JSON_ONLY_SYSTEM, CAREER_DETAIL_TEMPERATURE)
            .await
        {
            Ok(detail) => CareerPath {
                description: Some(detail.description),
                required_skills: Some(detail.required_skills),
                salary_range: Some(detail.salary_range),
                market_demand: detail.market_demand,
                certifications: Some(detail.certifications),
                experience_needed: Some(detail.experience_needed),
                ..base.clone()
            },
            Err(e) => {
                warn!("detail generation for '{}' failed, using fallback: {e}", base.title);
                fallback::career_detail(base)
            }
        }
    }

    async fn suggest_learning_plan(&self, skill: &str) -> String {
        let prompt = LEARNING_PLAN_PROMPT_TEMPLATE.replace("{skill}", skill);
        match self
            .llm
            .call_text(&prompt, MARKDOWN_SYSTEM, LEARNING_PLAN_TEMPERATURE)
            .await
        {
            Ok(plan) => plan,
            Err(e) => {
                warn!("learning plan for '{skill}' failed, using fallback: {e}");
                fallback::LEARNING_PLAN.to_string()
            }
        }
    }
}

fn list_prompt(
    category: SuggestionCategory,
    experiences: &[Experience],
    excluding: &[String],
) -> String {
    let (template, noun) = match category {
        SuggestionCategory::Tasks => (TASKS_PROMPT_TEMPLATE, "tasks"),
        SuggestionCategory::Skills => (SKILLS_PROMPT_TEMPLATE, "skills"),
        SuggestionCategory::Interests => (INTERESTS_PROMPT_TEMPLATE, "items"),
    };
    let exclusions = if excluding.is_empty() {
        String::new()
    } else {
        EXCLUSION_TEMPLATE
            .replace("{noun}", noun)
            .replace("{seen}", &excluding.join(", "))
    };
    template
        .replace("{experiences}", &summarise_experiences(experiences, false))
        .replace("{uk_market}", UK_MARKET_INSTRUCTION)
        .replace("{exclusions}", &exclusions)
}

fn fallback_list(category: SuggestionCategory) -> Vec<String> {
    fallback::list(match category {
        SuggestionCategory::Tasks => fallback::TASKS,
        SuggestionCategory::Skills => fallback::SKILLS,
        SuggestionCategory::Interests => fallback::INTERESTS,
    })
}

/// Trims, drops blanks and duplicates, keeps first-seen order.
fn clean_items(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|o| o == item) {
            out.push(item.to_string());
        }
    }
    out
}
