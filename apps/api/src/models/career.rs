use serde::{Deserialize, Serialize};

/// Which part of the profile made a career path relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceSource {
    Experience,
    Skill,
    Interest,
    Education,
}

impl RelevanceSource {
    pub const ALL: [RelevanceSource; 4] = [
        RelevanceSource::Experience,
        RelevanceSource::Skill,
        RelevanceSource::Interest,
        RelevanceSource::Education,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceTag {
    pub tag: String,
    pub source: RelevanceSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityData {
    pub statement: String,
    pub transferable_skills: Vec<String>,
}

/// A suggested career path. The optional fields are filled in by detail enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPath {
    pub title: String,
    pub skill_match_percentage: u8,
    pub market_demand: String,
    pub industry: String,
    #[serde(default)]
    pub relevance_tags: Vec<RelevanceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_needed: Option<String>,
}

/// Output of whole-profile generation: the identity summary plus suggested paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerProfile {
    pub identity: IdentityData,
    pub paths: Vec<CareerPath>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_career_path_deserializes_without_detail_fields() {
        let json = r#"{
            "title": "Instructional Designer",
            "skill_match_percentage": 72,
            "market_demand": "Growing",
            "industry": "Education",
            "relevance_tags": [
                {"tag": "Teacher", "source": "experience"},
                {"tag": "Technology", "source": "interest"}
            ]
        }"#;
        let path: CareerPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.skill_match_percentage, 72);
        assert_eq!(path.relevance_tags[1].source, RelevanceSource::Interest);
        assert!(path.description.is_none());
    }

    #[test]
    fn test_unknown_relevance_source_is_rejected() {
        let json = r#"{"tag": "x", "source": "hobby"}"#;
        assert!(serde_json::from_str::<RelevanceTag>(json).is_err());
    }
}
