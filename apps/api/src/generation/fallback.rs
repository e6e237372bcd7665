// Static content substituted when a generation call fails or returns junk.

use crate::models::career::CareerPath;

pub const TASKS: &[&str] = &[
    "General Administration",
    "Team Collaboration",
    "Project Planning",
    "Client Management",
    "Data Analysis",
    "Problem Solving",
];

pub const SKILLS: &[&str] = &[
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Leadership",
    "Data Analysis",
    "Project Management",
    "Adaptability",
    "Creativity",
    "Technical Proficiency",
    "Customer Service",
    "Time Management",
    "Critical Thinking",
];

pub const INTERESTS: &[&str] = &[
    "Continuous Learning",
    "Team Collaboration",
    "Innovation",
    "Work-life Balance",
    "Customer Satisfaction",
    "Problem Solving",
    "Leadership",
    "Efficiency",
    "Data-Driven Decisions",
    "Creative Thinking",
    "Mentoring Others",
    "Autonomy",
    "Social Impact",
    "Fast-Paced Environment",
    "Strategic Planning",
];

pub const STATEMENT: &str =
    "Unable to generate a statement at this time. Please check your inputs and try again.";

pub const LEARNING_PLAN: &str =
    "Unable to generate a learning plan at this time. Please try again later.";

pub const DETAIL_DESCRIPTION: &str =
    "Sorry, we couldn't fetch the full details for this career right now. Please try again later.";

pub fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The base path with placeholder detail fields.
pub fn career_detail(base: &CareerPath) -> CareerPath {
    CareerPath {
        description: Some(DETAIL_DESCRIPTION.to_string()),
        required_skills: Some(Vec::new()),
        salary_range: Some("N/A".to_string()),
        certifications: Some(Vec::new()),
        experience_needed: Some("N/A".to_string()),
        ..base.clone()
    }
}
