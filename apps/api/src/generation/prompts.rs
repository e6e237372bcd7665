// Prompt templates for every generation operation.
// Placeholders in braces are substituted with `str::replace` before the call.

pub const TASKS_PROMPT_TEMPLATE: &str = "\
Based on the following professional experiences:
{experiences}

Generate a concise list of 5 common tasks or responsibilities. Synthesise \
information from all provided roles to create a comprehensive list.
{uk_market}
Keep each task concise (under 10 words).
{exclusions}
Provide the output as a JSON array of strings.";

pub const SKILLS_PROMPT_TEMPLATE: &str = "\
Based on the following professional experiences:
{experiences}

Generate a list of 15 to 20 common skills, mixing soft and hard skills. \
Synthesise from all roles to create a comprehensive list.
{uk_market}
Keep each skill concise (1-2 words).
{exclusions}
Provide the output as a JSON array of strings.";

pub const INTERESTS_PROMPT_TEMPLATE: &str = "\
Based on the following professional experiences:
{experiences}

Generate a list of 15 to 20 items. This list should include a diverse mix of: \
potential career fields, related industries, professional interests, or work \
environment preferences. Synthesise information from all roles.
{uk_market}
Keep each item concise (1-2 words). Examples: 'Sustainable Technology', \
'Mentoring others', 'Data-driven decisions', 'FinTech Sector'.
{exclusions}
Provide the output as a JSON array of strings.";

/// Used when the caller passes already-seen suggestions.
pub const EXCLUSION_TEMPLATE: &str = "The user has already seen these {noun}: {seen}. \
Please generate a list of NEW and DIFFERENT {noun} that are also relevant.";

pub const STATEMENT_PROMPT_TEMPLATE: &str = "\
Craft a short, impactful personal statement based on the user's professional profile.
Keep the statement to 2-3 powerful sentences, written in the first person. Avoid clichés.
User's Profile:
{profile}
Return a JSON object: {\"statement\": \"...\"}";

pub const CAREER_PROFILE_PROMPT_TEMPLATE: &str = "\
Generate a comprehensive career profile based on the user's input.

The profile must include:
1. A Career Identity Statement: a short \"elevator pitch\" (2-3 sentences) summarising the user's professional value.
2. A list of 5-7 key transferable skills.
3. A list of 15 to 20 diverse but relevant career paths.

Rules for career paths:
- If the user's interests and skills diverge from their experience, treat it as a career change and give MORE weight to interests and skills.
- Mix aspirational paths (from interests), skill-based pivots, direct evolutions of experience, and education-based paths where education is relevant.
- Each relevance tag's source must be the DIRECT reason for the suggestion. Never tag a path with a source that is not logically connected to it.

User's Profile:
{profile}
{uk_market}

Return a single JSON object:
{\"identity\": {\"statement\": \"...\", \"transferable_skills\": [\"...\"]},
 \"paths\": [{\"title\": \"...\", \"skill_match_percentage\": 0-100, \"industry\": \"...\",
   \"market_demand\": \"High|Growing|Medium|Stable|Low\",
   \"relevance_tags\": [{\"tag\": \"...\", \"source\": \"experience|skill|interest|education\"}]}]}";

pub const CAREER_DETAIL_PROMPT_TEMPLATE: &str = "\
I need detailed information for the career path \"{title}\" in the \"{industry}\" industry.

Analyse this role in the context of the following user profile:
{profile}
{uk_market}

Return a single JSON object with:
- description: a brief, 2-sentence description of the role and why it fits the user
- required_skills: 5-7 top skills required for this role
- salary_range: a typical UK salary range, e.g. '£40,000 - £60,000 per year'
- market_demand: one of 'High', 'Growing', 'Medium', 'Stable', 'Low'
- certifications: 1-3 common certifications, or an empty array if none are typical
- experience_needed: typical years of experience, e.g. '2-4 years'";

pub const LEARNING_PLAN_PROMPT_TEMPLATE: &str = "\
Create a concise 1-month learning plan for a beginner looking to gain proficiency in \"{skill}\".
The plan should be actionable and easy to follow. Use these sections:
- **Week 1: Foundations**: the absolute basics, with 1-2 key free resources.
- **Week 2: Core Concepts**: the next-level concepts, with 1-2 resources.
- **Week 3: Practical Application**: a small, specific project idea.
- **Week 4: Advanced Topics & Project**: one advanced topic and how to extend the project.
Keep the descriptions brief and focused on action.";

pub const TASKS_TEMPERATURE: f32 = 0.4;
pub const SKILLS_TEMPERATURE: f32 = 0.5;
pub const INTERESTS_TEMPERATURE: f32 = 0.8;
pub const STATEMENT_TEMPERATURE: f32 = 0.6;
pub const CAREER_PROFILE_TEMPERATURE: f32 = 0.8;
pub const CAREER_DETAIL_TEMPERATURE: f32 = 0.5;
pub const LEARNING_PLAN_TEMPERATURE: f32 = 0.5;
