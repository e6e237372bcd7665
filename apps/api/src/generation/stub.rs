//! Deterministic in-memory facade for tests. Records every call.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::generation::{fallback, GenerationFacade};
use crate::llm_client::LlmError;
use crate::models::career::{CareerPath, CareerProfile, IdentityData};
use crate::models::profile::{Experience, ProfileDraft};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub roles: Vec<String>,
    pub excluding: Vec<String>,
}

pub struct StubFacade {
    pub tasks: Vec<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub statement: String,
    pub career_profile: Option<CareerProfile>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for StubFacade {
    fn default() -> Self {
        Self {
            tasks: vec!["Lesson planning".into(), "Marking".into()],
            skills: vec!["Excel".into(), "Teamwork".into()],
            interests: vec!["Technology".into(), "Mentoring Others".into()],
            statement: "I help people learn.".into(),
            career_profile: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubFacade {
    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_career_profile(mut self, profile: CareerProfile) -> Self {
        self.career_profile = Some(profile);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn record(&self, operation: &'static str, experiences: &[Experience], excluding: &[String]) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            roles: experiences.iter().map(|e| e.role.clone()).collect(),
            excluding: excluding.to_vec(),
        });
    }
}

#[async_trait]
impl GenerationFacade for StubFacade {
    async fn suggest_tasks(&self, experiences: &[Experience], excluding: &[String]) -> Vec<String> {
        self.record("tasks", experiences, excluding);
        self.tasks.clone()
    }

    async fn suggest_skills(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        self.record("skills", experiences, excluding);
        self.skills.clone()
    }

    async fn suggest_interests(
        &self,
        experiences: &[Experience],
        excluding: &[String],
    ) -> Vec<String> {
        self.record("interests", experiences, excluding);
        self.interests.clone()
    }

    async fn suggest_statement(&self, profile: &ProfileDraft) -> String {
        self.record("statement", &profile.experiences, &[]);
        self.statement.clone()
    }

    async fn suggest_career_profile(
        &self,
        profile: &ProfileDraft,
    ) -> Result<CareerProfile, AppError> {
        self.record("career_profile", &profile.experiences, &[]);
        self.career_profile
            .clone()
            .ok_or(AppError::ProfileGeneration(LlmError::EmptyContent))
    }

    async fn suggest_career_detail(&self, base: &CareerPath, profile: &ProfileDraft) -> CareerPath {
        self.record("career_detail", &profile.experiences, &[]);
        fallback::career_detail(base)
    }

    async fn suggest_learning_plan(&self, skill: &str) -> String {
        self.record("learning_plan", &[], &[]);
        format!("## Week 1: Foundations\nStart with {skill}.")
    }
}

pub fn sample_career_profile() -> CareerProfile {
    CareerProfile {
        identity: IdentityData {
            statement: "A teacher who explains things well.".into(),
            transferable_skills: vec!["Communication".into()],
        },
        paths: vec![],
    }
}

/// A completed draft: one teacher experience plus skills, interests and education.
pub fn sample_draft() -> ProfileDraft {
    ProfileDraft {
        experiences: vec![Experience {
            role: "Teacher".into(),
            industry: "Education".into(),
            tasks: "Lesson planning, Marking".into(),
        }],
        skills: "Communication, Planning, Patience".into(),
        interests: "Technology".into(),
        education: vec!["Bachelor's degree in History".into()],
    }
}
