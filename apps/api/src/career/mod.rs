// Career exploration over a finalized profile: whole-profile generation,
// per-path enrichment, learning plans, and filtering/sorting of the paths.

pub mod explore;
pub mod handlers;
