pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::career::handlers as career;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile wizard
        .route("/api/v1/wizard", post(wizard::handle_create_wizard))
        .route(
            "/api/v1/wizard/:id",
            get(wizard::handle_get_wizard).delete(wizard::handle_delete_wizard),
        )
        .route(
            "/api/v1/wizard/:id/actions",
            post(wizard::handle_wizard_actions),
        )
        // Career exploration
        .route("/api/v1/career/profile", post(career::handle_career_profile))
        .route("/api/v1/career/detail", post(career::handle_career_detail))
        .route(
            "/api/v1/career/learning-plan",
            post(career::handle_learning_plan),
        )
        .route("/api/v1/career/explore", post(career::handle_explore))
        .with_state(state)
}
