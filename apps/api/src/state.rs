use std::sync::Arc;

use crate::config::Config;
use crate::generation::GenerationFacade;
use crate::wizard::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Content generator. `LlmGenerationFacade` in production.
    pub facade: Arc<dyn GenerationFacade>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
