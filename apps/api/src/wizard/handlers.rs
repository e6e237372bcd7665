use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileDraft;
use crate::state::AppState;
use crate::wizard::controller::WizardView;
use crate::wizard::sequencer::PrimaryStep;
use crate::wizard::session::WizardSession;
use crate::wizard::{Outcome, WizardAction};

#[derive(Debug, Default, Deserialize)]
pub struct CreateWizardRequest {
    /// A previously completed draft to edit.
    #[serde(default)]
    pub initial: Option<ProfileDraft>,
    #[serde(default)]
    pub start_at_review: bool,
}

/// Either one action or an ordered batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionsRequest {
    Batch { actions: Vec<WizardAction> },
    Single(WizardAction),
}

impl ActionsRequest {
    fn into_actions(self) -> Vec<WizardAction> {
        match self {
            Self::Batch { actions } => actions,
            Self::Single(action) => vec![action],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub view: WizardView,
}

async fn load_session(state: &AppState, id: Uuid) -> Result<Arc<WizardSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Wizard session {id} not found")))
}

/// POST /api/v1/wizard
pub async fn handle_create_wizard(
    State(state): State<AppState>,
    body: Result<Json<CreateWizardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WizardResponse>), AppError> {
    // No JSON body at all means a fresh wizard; a body that fails to parse is an error.
    let req = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateWizardRequest::default(),
        Err(rejection) => return Err(AppError::Validation(rejection.body_text())),
    };
    let start = if req.start_at_review {
        PrimaryStep::Review
    } else {
        PrimaryStep::Role
    };
    let session = state.sessions.create(req.initial, start).await;
    let view = session.sync(state.facade.clone()).await?;
    Ok((
        StatusCode::CREATED,
        Json(WizardResponse {
            id: session.id,
            created_at: session.created_at,
            outcome: None,
            view,
        }),
    ))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = load_session(&state, id).await?;
    Ok(Json(WizardResponse {
        id,
        created_at: session.created_at,
        outcome: None,
        view: session.view().await,
    }))
}

/// DELETE /api/v1/wizard/:id
pub async fn handle_delete_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Wizard session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/wizard/:id/actions
pub async fn handle_wizard_actions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActionsRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = load_session(&state, id).await?;
    let report = session
        .apply(req.into_actions(), state.facade.clone())
        .await?;
    Ok(Json(WizardResponse {
        id,
        created_at: session.created_at,
        outcome: report.outcome,
        view: report.view,
    }))
}
