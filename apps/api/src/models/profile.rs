use serde::{Deserialize, Serialize};

/// Separator used by every comma-joined list field (tasks, skills, interests).
pub const LIST_SEPARATOR: &str = ", ";

/// A single work experience. `tasks` is a canonical comma-joined set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub tasks: String,
}

impl Experience {
    /// An experience with an empty role is a placeholder and never leaves the wizard.
    pub fn is_placeholder(&self) -> bool {
        self.role.trim().is_empty()
    }

    pub fn toggle_task(&mut self, task: &str) {
        self.tasks = toggle_item(&self.tasks, task);
    }
}

/// The user's profile as collected by the wizard and handed to the caller on finalize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub education: Vec<String>,
}

impl ProfileDraft {
    /// Experiences with a non-empty role, in their original order.
    pub fn real_experiences(&self) -> Vec<Experience> {
        self.experiences
            .iter()
            .filter(|e| !e.is_placeholder())
            .cloned()
            .collect()
    }

    /// The draft as emitted to the caller: placeholder experiences dropped.
    pub fn finalized(&self) -> ProfileDraft {
        ProfileDraft {
            experiences: self.real_experiences(),
            skills: self.skills.clone(),
            interests: self.interests.clone(),
            education: self.education.clone(),
        }
    }

    /// True when there is anything worth summarising in a personal statement.
    pub fn has_content(&self) -> bool {
        !self.real_experiences().is_empty()
            || !self.skills.trim().is_empty()
            || !self.interests.trim().is_empty()
            || !self.education.is_empty()
    }

    pub fn distinct_skill_count(&self) -> usize {
        distinct_items(&self.skills).len()
    }

    pub fn toggle_skill(&mut self, skill: &str) {
        self.skills = toggle_item(&self.skills, skill);
    }

    pub fn toggle_interest(&mut self, interest: &str) {
        self.interests = toggle_item(&self.interests, interest);
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills = remove_item(&self.skills, skill);
    }

    pub fn remove_interest(&mut self, interest: &str) {
        self.interests = remove_item(&self.interests, interest);
    }
}

/// Splits a comma-joined list into its non-empty, trimmed items (duplicates kept).
pub fn split_items(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Items in order of first appearance with duplicates collapsed.
pub fn distinct_items(joined: &str) -> Vec<&str> {
    let mut seen = Vec::new();
    for item in split_items(joined) {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Rewrites free text into the canonical `", "`-joined form.
pub fn canonicalize(joined: &str) -> String {
    distinct_items(joined).join(LIST_SEPARATOR)
}

/// Symmetric difference with a single item: removes it when present, appends it otherwise.
/// The relative order of the remaining items is preserved.
pub fn toggle_item(joined: &str, item: &str) -> String {
    let item = item.trim();
    if item.is_empty() {
        return joined.to_string();
    }
    let mut items = split_items(joined);
    if items.contains(&item) {
        items.retain(|i| *i != item);
    } else {
        items.push(item);
    }
    items.join(LIST_SEPARATOR)
}

/// Set difference with a single item. Absent items leave the list unchanged.
pub fn remove_item(joined: &str, item: &str) -> String {
    let item = item.trim();
    split_items(joined)
        .into_iter()
        .filter(|i| *i != item)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
