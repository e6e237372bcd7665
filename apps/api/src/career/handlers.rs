use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::career::explore::{explore, ExploredPath, SortField, SortOrder};
use crate::errors::AppError;
use crate::models::career::{CareerPath, CareerProfile, RelevanceSource};
use crate::models::profile::ProfileDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CareerProfileRequest {
    pub profile: ProfileDraft,
}

#[derive(Debug, Deserialize)]
pub struct CareerDetailRequest {
    pub path: CareerPath,
    #[serde(default)]
    pub profile: ProfileDraft,
}

#[derive(Debug, Deserialize)]
pub struct LearningPlanRequest {
    pub skill: String,
}

#[derive(Debug, Serialize)]
pub struct LearningPlanResponse {
    pub skill: String,
    pub plan: String,
}

fn all_sources() -> Vec<RelevanceSource> {
    RelevanceSource::ALL.to_vec()
}

#[derive(Debug, Deserialize)]
pub struct ExploreRequest {
    pub paths: Vec<CareerPath>,
    #[serde(default = "all_sources")]
    pub sources: Vec<RelevanceSource>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct ExploreResponse {
    pub paths: Vec<ExploredPath>,
}

/// POST /api/v1/career/profile
pub async fn handle_career_profile(
    State(state): State<AppState>,
    Json(req): Json<CareerProfileRequest>,
) -> Result<Json<CareerProfile>, AppError> {
    let profile = req.profile.finalized();
    if !profile.has_content() {
        return Err(AppError::Validation(
            "profile has no experiences, skills, interests or education".to_string(),
        ));
    }
    let career = state.facade.suggest_career_profile(&profile).await?;
    info!(paths = career.paths.len(), "career profile generated");
    Ok(Json(career))
}

/// POST /api/v1/career/detail
pub async fn handle_career_detail(
    State(state): State<AppState>,
    Json(req): Json<CareerDetailRequest>,
) -> Result<Json<CareerPath>, AppError> {
    let detailed = state
        .facade
        .suggest_career_detail(&req.path, &req.profile.finalized())
        .await;
    Ok(Json(detailed))
}

/// POST /api/v1/career/learning-plan
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(req): Json<LearningPlanRequest>,
) -> Result<Json<LearningPlanResponse>, AppError> {
    let skill = req.skill.trim();
    if skill.is_empty() {
        return Err(AppError::Validation("skill must not be empty".to_string()));
    }
    let plan = state.facade.suggest_learning_plan(skill).await;
    Ok(Json(LearningPlanResponse {
        skill: skill.to_string(),
        plan,
    }))
}

/// POST /api/v1/career/explore
pub async fn handle_explore(Json(req): Json<ExploreRequest>) -> Json<ExploreResponse> {
    Json(ExploreResponse {
        paths: explore(req.paths, &req.sources, req.sort_by, req.order),
    })
}
