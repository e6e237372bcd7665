//! Suggestion caches for tasks, skills and interests.
//!
//! Each cache remembers the generation key it last fetched for, so the
//! "fetch once per key until reset" rule is a single key comparison. A fetch is
//! split into `begin` (marks loading and hands out a ticket) and `complete`
//! (applies the result unless the cache was reset in between). The facade call
//! happens between the two without any borrow of the cache.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::profile::{split_items, Experience};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Tasks,
    Skills,
    Interests,
}

/// Which cache a ticket belongs to. The sub-flow has its own task cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSlot {
    Primary(SuggestionCategory),
    SubFlowTasks,
}

impl CacheSlot {
    pub fn category(self) -> SuggestionCategory {
        match self {
            Self::Primary(category) => category,
            Self::SubFlowTasks => SuggestionCategory::Tasks,
        }
    }
}

/// The set of (role, industry) pairs of real experiences. Order-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationKey(BTreeSet<(String, String)>);

impl GenerationKey {
    /// `None` when no experience has a role, since there is nothing to generate from.
    pub fn from_experiences(experiences: &[Experience]) -> Option<Self> {
        let pairs: BTreeSet<_> = experiences
            .iter()
            .filter(|e| !e.is_placeholder())
            .map(|e| (e.role.trim().to_string(), e.industry.trim().to_string()))
            .collect();
        (!pairs.is_empty()).then_some(Self(pairs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// First fetch for a key; the result replaces the items.
    Initial,
    /// Manual regenerate; the result is unioned into whatever items exist at completion.
    Regenerate,
}

/// An outstanding fetch. Carries everything the facade needs.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub slot: CacheSlot,
    pub kind: FetchKind,
    pub experiences: Vec<Experience>,
    pub excluding: Vec<String>,
    key: GenerationKey,
    epoch: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    items: Vec<String>,
    is_loading: bool,
    key: Option<GenerationKey>,
    epoch: u64,
}

impl SuggestionCache {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Starts a fetch unless one is already in flight. Initial fetches are also
    /// skipped when this key was already fetched.
    pub fn begin(
        &mut self,
        slot: CacheSlot,
        kind: FetchKind,
        experiences: &[Experience],
    ) -> Option<FetchTicket> {
        let key = GenerationKey::from_experiences(experiences)?;
        if self.is_loading {
            debug!(?slot, "suggestion fetch suppressed: request already in flight");
            return None;
        }
        if kind == FetchKind::Initial && self.key.as_ref() == Some(&key) {
            return None;
        }

        self.is_loading = true;
        self.key = Some(key.clone());
        Some(FetchTicket {
            slot,
            kind,
            experiences: experiences
                .iter()
                .filter(|e| !e.is_placeholder())
                .cloned()
                .collect(),
            excluding: match kind {
                FetchKind::Initial => Vec::new(),
                FetchKind::Regenerate => self.items.clone(),
            },
            key,
            epoch: self.epoch,
        })
    }

    /// Applies a fetch result. Returns false when the result was stale and dropped.
    pub fn complete(&mut self, ticket: &FetchTicket, items: Vec<String>) -> bool {
        if ticket.epoch != self.epoch {
            debug!(slot = ?ticket.slot, "discarding suggestions for a reset cache");
            return false;
        }
        self.is_loading = false;
        match ticket.kind {
            FetchKind::Initial => {
                self.items.clear();
                self.union(items);
            }
            FetchKind::Regenerate => self.union(items),
        }
        self.key = Some(ticket.key.clone());
        true
    }

    /// Forgets items and key; any in-flight result will be discarded.
    pub fn reset(&mut self) {
        self.items.clear();
        self.is_loading = false;
        self.key = None;
        self.epoch += 1;
    }

    fn union(&mut self, items: Vec<String>) {
        for item in items {
            let item = item.trim();
            if !item.is_empty() && !self.items.iter().any(|i| i == item) {
                self.items.push(item.to_string());
            }
        }
    }

    /// Chips to display: cached suggestions first, then selected items the
    /// cache never offered. One chip per distinct string.
    pub fn chips(&self, selected: &str) -> Vec<String> {
        let mut chips = self.items.clone();
        for item in split_items(selected) {
            if !chips.iter().any(|c| c == item) {
                chips.push(item.to_string());
            }
        }
        chips
    }
}

/// The primary flow's three caches.
#[derive(Debug, Clone, Default)]
pub struct PrimarySuggestions {
    pub tasks: SuggestionCache,
    pub skills: SuggestionCache,
    pub interests: SuggestionCache,
}

impl PrimarySuggestions {
    pub fn get(&self, category: SuggestionCategory) -> &SuggestionCache {
        match category {
            SuggestionCategory::Tasks => &self.tasks,
            SuggestionCategory::Skills => &self.skills,
            SuggestionCategory::Interests => &self.interests,
        }
    }

    pub fn get_mut(&mut self, category: SuggestionCategory) -> &mut SuggestionCache {
        match category {
            SuggestionCategory::Tasks => &mut self.tasks,
            SuggestionCategory::Skills => &mut self.skills,
            SuggestionCategory::Interests => &mut self.interests,
        }
    }

    pub fn reset_all(&mut self) {
        self.tasks.reset();
        self.skills.reset();
        self.interests.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILLS: CacheSlot = CacheSlot::Primary(SuggestionCategory::Skills);

    fn exp(role: &str, industry: &str) -> Experience {
        Experience {
            role: role.into(),
            industry: industry.into(),
            tasks: String::new(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_key_without_real_experience() {
        assert!(GenerationKey::from_experiences(&[exp("", "Retail")]).is_none());
        let mut cache = SuggestionCache::default();
        assert!(cache
            .begin(SKILLS, FetchKind::Initial, &[Experience::default()])
            .is_none());
        assert!(!cache.is_loading());
    }

    #[test]
    fn test_key_is_order_insensitive() {
        let a = GenerationKey::from_experiences(&[exp("Teacher", ""), exp("Nurse", "NHS")]);
        let b = GenerationKey::from_experiences(&[exp("Nurse", "NHS"), exp("Teacher", "")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_initial_fetch_once_per_key() {
        let exps = [exp("Teacher", "Education")];
        let mut cache = SuggestionCache::default();
        let ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        assert!(cache.is_loading());
        assert!(cache.begin(SKILLS, FetchKind::Initial, &exps).is_none());
        assert!(cache.complete(&ticket, strings(&["Excel"])));
        assert!(!cache.is_loading());
        assert!(cache.begin(SKILLS, FetchKind::Initial, &exps).is_none());

        let changed = [exp("Teacher", "Private tutoring")];
        assert!(cache.begin(SKILLS, FetchKind::Initial, &changed).is_some());
    }

    #[test]
    fn test_second_trigger_while_loading_is_suppressed() {
        let exps = [exp("Teacher", "")];
        let mut cache = SuggestionCache::default();
        let _ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        assert!(cache.begin(SKILLS, FetchKind::Regenerate, &exps).is_none());
    }

    #[test]
    fn test_regenerate_unions_and_passes_exclusions() {
        let exps = [exp("Analyst", "Finance")];
        let mut cache = SuggestionCache::default();
        let ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        cache.complete(&ticket, strings(&["Excel", "Teamwork"]));

        let regen = cache.begin(SKILLS, FetchKind::Regenerate, &exps).unwrap();
        assert_eq!(regen.excluding, strings(&["Excel", "Teamwork"]));
        assert!(cache.complete(&regen, strings(&["Excel", "Leadership"])));
        assert_eq!(cache.items(), strings(&["Excel", "Teamwork", "Leadership"]).as_slice());
    }

    #[test]
    fn test_reset_discards_in_flight_result() {
        let exps = [exp("Teacher", "")];
        let mut cache = SuggestionCache::default();
        let ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        cache.reset();
        assert!(!cache.complete(&ticket, strings(&["Stale"])));
        assert!(cache.items().is_empty());
        assert!(!cache.is_loading());
        assert!(cache.begin(SKILLS, FetchKind::Initial, &exps).is_some());
    }

    #[test]
    fn test_ticket_drops_placeholder_experiences() {
        let exps = [exp("", ""), exp("Teacher", "")];
        let mut cache = SuggestionCache::default();
        let ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        assert_eq!(ticket.experiences.len(), 1);
    }

    #[test]
    fn test_chips_merge_without_duplicates() {
        let exps = [exp("Teacher", "")];
        let mut cache = SuggestionCache::default();
        let ticket = cache.begin(SKILLS, FetchKind::Initial, &exps).unwrap();
        cache.complete(&ticket, strings(&["Excel", "Teamwork", "Excel"]));
        assert_eq!(
            cache.chips("Teamwork, Origami"),
            strings(&["Excel", "Teamwork", "Origami"])
        );
    }
}
