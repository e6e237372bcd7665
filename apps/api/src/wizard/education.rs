//! Education entries: the preset level catalogue, the per-visit scratch fields,
//! and the `"<level> in <subject>"` entry format.

use serde::{Deserialize, Serialize};

/// Literal delimiter between level and subject in a stored entry.
pub const SUBJECT_DELIMITER: &str = " in ";

pub const EDUCATION_LEVELS: &[&str] = &[
    "High School diploma",
    "GCSE",
    "Associate's degree",
    "Bachelor's degree",
    "Master's degree",
    "Doctorate",
    "Professional certificate",
    "Technical certificate",
];

/// A stored education entry split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub level: String,
    pub subject: Option<String>,
}

impl EducationEntry {
    /// Splits on the first `" in "` only; later occurrences belong to the subject.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once(SUBJECT_DELIMITER) {
            Some((level, subject)) => Self {
                level: level.to_string(),
                subject: Some(subject.to_string()),
            },
            None => Self {
                level: entry.to_string(),
                subject: None,
            },
        }
    }

    pub fn format(&self) -> String {
        match self.subject.as_deref().filter(|s| !s.is_empty()) {
            Some(subject) => format!("{}{SUBJECT_DELIMITER}{subject}", self.level),
            None => self.level.clone(),
        }
    }
}

/// The level picked on the education step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LevelChoice {
    #[default]
    Unset,
    Preset(String),
    Custom,
}

/// Scratch fields for the next education entry. Cleared after each append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationScratch {
    pub level: LevelChoice,
    pub custom_level: String,
    pub subject: String,
}

impl EducationScratch {
    /// Picks a level. A preset outside the catalogue is treated as custom text.
    pub fn choose_level(&mut self, level: &str) {
        if EDUCATION_LEVELS.contains(&level) {
            self.level = LevelChoice::Preset(level.to_string());
        } else {
            self.level = LevelChoice::Custom;
            self.custom_level = level.to_string();
        }
    }

    /// Editing the custom text implies the custom choice.
    pub fn set_custom_level(&mut self, text: &str) {
        self.custom_level = text.to_string();
        self.level = LevelChoice::Custom;
    }

    pub fn set_subject(&mut self, subject: &str) {
        self.subject = subject.to_string();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn effective_level(&self) -> Option<String> {
        let level = match &self.level {
            LevelChoice::Unset => return None,
            LevelChoice::Preset(level) => level.trim(),
            LevelChoice::Custom => self.custom_level.trim(),
        };
        (!level.is_empty()).then(|| level.to_string())
    }

    /// The formatted entry these fields describe, if a level was given.
    pub fn compose(&self) -> Option<String> {
        let level = self.effective_level()?;
        let subject = self.subject.trim();
        let entry = EducationEntry {
            level,
            subject: (!subject.is_empty()).then(|| subject.to_string()),
        };
        Some(entry.format())
    }
}
