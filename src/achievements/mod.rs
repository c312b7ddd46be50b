//! Achievement catalog and evaluation engine.
//!
//! Achievements are seeded once from a fixed catalog and re-scored against
//! the cumulative shift history after every shift-affecting event. The
//! engine is pure and re-run-safe; unlocking is monotonic.

mod catalog;
mod engine;

pub use catalog::{AchievementCatalog, CatalogEntry, Requirement};
pub use engine::{
    AchievementEngine, Evaluation, rarity_distribution, total_points, unlocked_by_category,
    weighted_score,
};
