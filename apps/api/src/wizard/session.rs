//! In-memory wizard sessions.
//!
//! A session owns one controller behind an async mutex. Actions are applied
//! under the lock; generation requests run after it is released and their
//! results are handed back under the lock again, so a slow model call never
//! blocks other actions on the same session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generation::GenerationFacade;
use crate::models::profile::ProfileDraft;
use crate::wizard::controller::{
    GenerationRequest, GenerationResult, WizardController, WizardView,
};
use crate::wizard::sequencer::PrimaryStep;
use crate::wizard::{Outcome, WizardAction, WizardError, WizardObserver};

/// What a batch of actions produced.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    /// The last navigation outcome in the batch, if any action navigated.
    pub outcome: Option<Outcome>,
    pub view: WizardView,
}

pub struct WizardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    controller: Mutex<WizardController>,
    last_active_ms: AtomicI64,
}

impl WizardSession {
    fn new(id: Uuid, controller: WizardController) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            controller: Mutex::new(controller),
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
        }
    }

    fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() - self.last_active_ms.load(Ordering::Relaxed)
            > ttl.num_milliseconds()
    }

    pub async fn view(&self) -> WizardView {
        self.controller.lock().await.view()
    }

    /// Applies `actions` in order, then runs whatever generation they made due.
    ///
    /// Actions before a failing one stay applied, and fetches they started
    /// still complete before the error is returned.
    pub async fn apply(
        self: &Arc<Self>,
        actions: Vec<WizardAction>,
        facade: Arc<dyn GenerationFacade>,
    ) -> Result<ActionReport, WizardError> {
        let mut outcome = None;
        let mut requests = Vec::new();
        let mut failure = None;
        {
            let mut controller = self.controller.lock().await;
            for action in actions {
                debug!(session_id = %self.id, ?action, "applying wizard action");
                match controller.apply(action) {
                    Ok(effect) => {
                        if effect.outcome.is_some() {
                            outcome = effect.outcome;
                        }
                        requests.extend(effect.requests);
                    }
                    Err(err) => {
                        failure = Some(err);
                        break;
                    }
                }
            }
        }

        self.dispatch(requests, facade).await?;
        if let Some(err) = failure {
            return Err(err);
        }
        Ok(ActionReport {
            outcome,
            view: self.view().await,
        })
    }

    /// Issues fetches the current step needs without applying any action.
    pub async fn sync(
        self: &Arc<Self>,
        facade: Arc<dyn GenerationFacade>,
    ) -> Result<WizardView, WizardError> {
        let requests = self.controller.lock().await.due_requests();
        self.dispatch(requests, facade).await?;
        Ok(self.view().await)
    }

    /// Runs `requests` on a detached task and waits for it. If the caller's
    /// future is dropped the task still completes, so no cache is left loading.
    async fn dispatch(
        self: &Arc<Self>,
        requests: Vec<GenerationRequest>,
        facade: Arc<dyn GenerationFacade>,
    ) -> Result<(), WizardError> {
        if requests.is_empty() {
            return Ok(());
        }
        let session = Arc::clone(self);
        let task = tokio::spawn(async move { session.run(requests, facade.as_ref()).await });
        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(session_id = %self.id, "generation task did not finish: {e}");
                Ok(())
            }
        }
    }

    async fn run(
        &self,
        requests: Vec<GenerationRequest>,
        facade: &dyn GenerationFacade,
    ) -> Result<(), WizardError> {
        for request in requests {
            let result = execute(request, facade).await;
            let mut controller = self.controller.lock().await;
            if !controller.complete(result) && !controller.is_mounted() {
                return Err(WizardError::Unmounted);
            }
        }
        Ok(())
    }

    async fn unmount(&self) {
        self.controller.lock().await.unmount();
    }
}

/// Performs one generation request against the facade.
pub async fn execute(request: GenerationRequest, facade: &dyn GenerationFacade) -> GenerationResult {
    match request {
        GenerationRequest::Suggestions(ticket) => {
            let items = facade
                .suggest(ticket.slot.category(), &ticket.experiences, &ticket.excluding)
                .await;
            GenerationResult::Suggestions(ticket, items)
        }
        GenerationRequest::Statement(ticket) => {
            let text = facade.suggest_statement(&ticket.profile).await;
            GenerationResult::Statement(ticket, text)
        }
    }
}

/// Logs wizard events against the owning session.
pub struct TracingObserver {
    pub session_id: Uuid,
}

impl WizardObserver for TracingObserver {
    fn on_step_position_change(&self, index: usize) {
        debug!(session_id = %self.session_id, step = index, "wizard step changed");
    }

    fn on_complete(&self, profile: &ProfileDraft) {
        info!(
            session_id = %self.session_id,
            experiences = profile.experiences.len(),
            "wizard completed"
        );
    }
}

/// All live sessions. Idle sessions expire lazily after `ttl`.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<WizardSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self, initial: Option<ProfileDraft>, start: PrimaryStep) -> Arc<WizardSession> {
        self.purge_expired().await;

        let id = Uuid::new_v4();
        let observer = Arc::new(TracingObserver { session_id: id });
        let session = Arc::new(WizardSession::new(
            id,
            WizardController::new(initial, start, observer),
        ));
        self.sessions.write().await.insert(id, session.clone());
        info!(session_id = %id, ?start, "wizard session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<WizardSession>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        if session.is_expired(self.ttl, Utc::now()) {
            debug!(session_id = %id, "wizard session expired");
            self.remove(id).await;
            return None;
        }
        session.touch();
        Some(session)
    }

    /// Removes and unmounts a session. In-flight results for it are dropped.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.unmount().await;
                true
            }
            None => false,
        }
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<Arc<WizardSession>> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, s)| s.is_expired(self.ttl, now))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };
        for session in &expired {
            session.unmount().await;
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "purged expired wizard sessions");
        }
        expired.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::errors::AppError;
    use crate::generation::stub::StubFacade;
    use crate::models::career::{CareerPath, CareerProfile};
    use crate::models::profile::Experience;
    use crate::wizard::sequencer::WizardPosition;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30))
    }

    fn stub() -> Arc<StubFacade> {
        Arc::new(StubFacade::default())
    }

    fn role(value: &str) -> WizardAction {
        WizardAction::SetRole {
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn test_apply_runs_due_fetches_after_actions() {
        let store = store();
        let facade = stub();
        let session = store.create(None, PrimaryStep::Role).await;

        let report = session
            .apply(
                vec![role("Teacher"), WizardAction::Advance, WizardAction::Advance],
                facade.clone(),
            )
            .await
            .unwrap();

        assert_eq!(report.outcome, Some(Outcome::Moved));
        assert_eq!(
            report.view.position,
            WizardPosition::Primary {
                step: PrimaryStep::Tasks
            }
        );
        assert_eq!(report.view.tasks.chips, vec!["Lesson planning", "Marking"]);
        assert!(!report.view.tasks.is_loading);
        assert_eq!(facade.count("tasks"), 1);

        // Revisiting the step with the same experiences does not refetch.
        session
            .apply(vec![WizardAction::Retreat, WizardAction::Advance], facade.clone())
            .await
            .unwrap();
        assert_eq!(facade.count("tasks"), 1);
    }

    #[tokio::test]
    async fn test_regenerate_passes_exclusions() {
        let store = store();
        let facade = Arc::new(StubFacade::default().with_skills(&["Excel", "Leadership"]));
        let session = store.create(None, PrimaryStep::Role).await;
        session
            .apply(
                vec![role("Analyst"), WizardAction::JumpTo { step: 3 }],
                facade.clone(),
            )
            .await
            .unwrap();
        let report = session
            .apply(vec![WizardAction::Regenerate], facade.clone())
            .await
            .unwrap();

        let calls = facade.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].operation, "skills");
        assert_eq!(calls[1].excluding, vec!["Excel", "Leadership"]);
        assert_eq!(report.view.skills.chips, vec!["Excel", "Leadership"]);
    }

    #[tokio::test]
    async fn test_sync_fetches_statement_on_review_start() {
        let store = store();
        let facade = stub();
        let initial = ProfileDraft {
            experiences: vec![Experience {
                role: "Teacher".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let session = store.create(Some(initial), PrimaryStep::Review).await;
        let view = session.sync(facade.clone()).await.unwrap();
        assert_eq!(view.statement.text.as_deref(), Some("I help people learn."));
        assert_eq!(facade.count("statement"), 1);

        session.sync(facade.clone()).await.unwrap();
        assert_eq!(facade.count("statement"), 1);
    }

    #[tokio::test]
    async fn test_error_keeps_earlier_actions() {
        let store = store();
        let session = store.create(None, PrimaryStep::Role).await;
        let err = session
            .apply(
                vec![role("Teacher"), WizardAction::RemoveSkill { skill: "x".into() }],
                stub(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, WizardError::ReviewOnly);
        assert_eq!(session.view().await.draft.experiences[0].role, "Teacher");
    }

    #[tokio::test]
    async fn test_failed_batch_still_completes_started_fetch() {
        let store = store();
        let facade = stub();
        let session = store.create(None, PrimaryStep::Role).await;
        let err = session
            .apply(
                vec![
                    role("Teacher"),
                    WizardAction::JumpTo { step: 2 },
                    WizardAction::RemoveSkill { skill: "x".into() },
                ],
                facade.clone(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, WizardError::ReviewOnly);

        let view = session.view().await;
        assert!(!view.tasks.is_loading);
        assert_eq!(view.tasks.chips, vec!["Lesson planning", "Marking"]);
        assert_eq!(facade.count("tasks"), 1);

        // The cache is usable afterwards.
        session
            .apply(vec![WizardAction::Regenerate], facade.clone())
            .await
            .unwrap();
        assert_eq!(facade.count("tasks"), 2);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let store = store();
        let session = store.create(None, PrimaryStep::Role).await;
        assert!(store.get(session.id).await.is_some());

        session.last_active_ms.store(0, Ordering::Relaxed);
        assert!(store.get(session.id).await.is_none());
        assert_eq!(store.session_count().await, 0);

        let err = session
            .apply(vec![WizardAction::Advance], stub())
            .await
            .unwrap_err();
        assert_eq!(err, WizardError::Unmounted);
    }

    #[tokio::test]
    async fn test_purge_expired_counts() {
        let store = store();
        let stale = store.create(None, PrimaryStep::Role).await;
        store.create(None, PrimaryStep::Role).await;
        stale.last_active_ms.store(0, Ordering::Relaxed);
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.session_count().await, 1);
        assert!(!store.remove(stale.id).await);
    }

    /// Records the call, then holds the reply until released.
    struct GatedFacade {
        inner: StubFacade,
        gate: Notify,
    }

    fn gated() -> Arc<GatedFacade> {
        Arc::new(GatedFacade {
            inner: StubFacade::default(),
            gate: Notify::new(),
        })
    }

    #[async_trait]
    impl GenerationFacade for GatedFacade {
        async fn suggest_tasks(&self, experiences: &[Experience], excluding: &[String]) -> Vec<String> {
            let items = self.inner.suggest_tasks(experiences, excluding).await;
            self.gate.notified().await;
            items
        }

        async fn suggest_skills(&self, experiences: &[Experience], excluding: &[String]) -> Vec<String> {
            self.inner.suggest_skills(experiences, excluding).await
        }

        async fn suggest_interests(
            &self,
            experiences: &[Experience],
            excluding: &[String],
        ) -> Vec<String> {
            self.inner.suggest_interests(experiences, excluding).await
        }

        async fn suggest_statement(&self, profile: &ProfileDraft) -> String {
            self.inner.suggest_statement(profile).await
        }

        async fn suggest_career_profile(
            &self,
            profile: &ProfileDraft,
        ) -> Result<CareerProfile, AppError> {
            self.inner.suggest_career_profile(profile).await
        }

        async fn suggest_career_detail(&self, base: &CareerPath, profile: &ProfileDraft) -> CareerPath {
            self.inner.suggest_career_detail(base, profile).await
        }

        async fn suggest_learning_plan(&self, skill: &str) -> String {
            self.inner.suggest_learning_plan(skill).await
        }
    }

    /// Starts `Teacher` + jump to tasks on a separate task and waits until the
    /// tasks fetch is held at the gate.
    async fn start_tasks_fetch(
        session: &Arc<WizardSession>,
        facade: &Arc<GatedFacade>,
    ) -> tokio::task::JoinHandle<Result<ActionReport, WizardError>> {
        let task = {
            let session = session.clone();
            let facade: Arc<dyn GenerationFacade> = facade.clone();
            tokio::spawn(async move {
                session
                    .apply(vec![role("Teacher"), WizardAction::JumpTo { step: 2 }], facade)
                    .await
            })
        };
        while facade.inner.count("tasks") == 0 {
            tokio::task::yield_now().await;
        }
        task
    }

    #[tokio::test]
    async fn test_result_after_delete_is_discarded() {
        let store = store();
        let facade = gated();
        let session = store.create(None, PrimaryStep::Role).await;
        let task = start_tasks_fetch(&session, &facade).await;

        // The fetch is in flight and the session lock is free.
        assert!(store.remove(session.id).await);
        facade.gate.notify_one();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, WizardError::Unmounted);
        let view = session.view().await;
        assert!(view.tasks.chips.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_strand_fetch() {
        let store = store();
        let facade = gated();
        let session = store.create(None, PrimaryStep::Role).await;
        let task = start_tasks_fetch(&session, &facade).await;

        // The client disconnects while the fetch is in flight.
        task.abort();
        let _ = task.await;
        facade.gate.notify_one();

        for _ in 0..100 {
            if !session.view().await.tasks.is_loading {
                break;
            }
            tokio::task::yield_now().await;
        }
        let view = session.view().await;
        assert!(!view.tasks.is_loading);
        assert_eq!(view.tasks.chips, vec!["Lesson planning", "Marking"]);
    }

    #[tokio::test]
    async fn test_concurrent_action_while_fetch_in_flight() {
        let store = store();
        let facade = gated();
        let session = store.create(None, PrimaryStep::Role).await;
        let session = store.get(session.id).await.unwrap();
        let task = start_tasks_fetch(&session, &facade).await;

        // The user selects a custom task while suggestions load.
        let report = session
            .apply(
                vec![WizardAction::AddCustom {
                    value: "Trips".into(),
                }],
                facade.clone(),
            )
            .await
            .unwrap();
        assert!(report.view.tasks.is_loading);
        facade.gate.notify_one();

        let report = task.await.unwrap().unwrap();
        assert_eq!(
            report.view.tasks.chips,
            vec!["Lesson planning", "Marking", "Trips"]
        );
        assert_eq!(report.view.tasks.selected, vec!["Trips"]);
    }
}
