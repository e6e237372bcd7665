//! Filtering and ordering of suggested career paths.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::career::{CareerPath, RelevanceSource};

/// Colour priority when a path is relevant through several sources.
pub const SOURCE_PRIORITY: [RelevanceSource; 4] = [
    RelevanceSource::Experience,
    RelevanceSource::Education,
    RelevanceSource::Skill,
    RelevanceSource::Interest,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Match,
    Demand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A path together with the sources it is relevant through, in priority order.
#[derive(Debug, Clone, Serialize)]
pub struct ExploredPath {
    #[serde(flatten)]
    pub path: CareerPath,
    pub sources: Vec<RelevanceSource>,
}

/// Market demand as a sortable rank. Unknown labels rank lowest.
pub fn demand_rank(demand: &str) -> u8 {
    match demand.trim().to_lowercase().as_str() {
        "high" => 5,
        "growing" => 4,
        "medium" | "stable" => 3,
        "low" => 2,
        _ => 0,
    }
}

/// Paths with at least one tag from an active source. Every source active
/// returns all paths, untagged ones included; no source active returns none.
pub fn filter_paths(paths: Vec<CareerPath>, active: &HashSet<RelevanceSource>) -> Vec<CareerPath> {
    if RelevanceSource::ALL.iter().all(|s| active.contains(s)) {
        return paths;
    }
    if active.is_empty() {
        return Vec::new();
    }
    paths
        .into_iter()
        .filter(|p| p.relevance_tags.iter().any(|t| active.contains(&t.source)))
        .collect()
}

/// Stable sort; ties keep their incoming order in both directions.
pub fn sort_paths(paths: &mut [CareerPath], field: SortField, order: SortOrder) {
    paths.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &CareerPath, b: &CareerPath, field: SortField) -> Ordering {
    match field {
        SortField::Match => a.skill_match_percentage.cmp(&b.skill_match_percentage),
        SortField::Demand => demand_rank(&a.market_demand).cmp(&demand_rank(&b.market_demand)),
    }
}

pub fn ordered_sources(path: &CareerPath) -> Vec<RelevanceSource> {
    SOURCE_PRIORITY
        .into_iter()
        .filter(|s| path.relevance_tags.iter().any(|t| t.source == *s))
        .collect()
}

pub fn explore(
    paths: Vec<CareerPath>,
    active: &[RelevanceSource],
    field: SortField,
    order: SortOrder,
) -> Vec<ExploredPath> {
    let active: HashSet<_> = active.iter().copied().collect();
    let mut paths = filter_paths(paths, &active);
    sort_paths(&mut paths, field, order);
    paths
        .into_iter()
        .map(|path| ExploredPath {
            sources: ordered_sources(&path),
            path,
        })
        .collect()
}
