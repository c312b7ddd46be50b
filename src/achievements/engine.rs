//! Achievement evaluation.
//!
//! The engine scores the achievement records against the cumulative shift
//! history. Evaluation is pure in its inputs and idempotent: the same
//! history always yields the same progress and unlock state, and running it
//! twice in a row without new data changes nothing. Unlocking is monotonic;
//! a shrinking history (a deleted shift, say) never re-locks anything.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::aggregate_history;
use crate::config::EngineConfig;
use crate::models::{
    Achievement, AchievementCategory, AchievementRarity, Bonus, Job, Shift,
};

use super::catalog::AchievementCatalog;

/// The outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The full updated achievement set, in the input order.
    pub achievements: Vec<Achievement>,
    /// Catalog ids that flipped to unlocked in this pass.
    pub newly_unlocked: Vec<String>,
}

/// Evaluates the achievement catalog over the shift history.
#[derive(Debug, Clone)]
pub struct AchievementEngine {
    catalog: AchievementCatalog,
    config: EngineConfig,
}

impl AchievementEngine {
    /// Creates an engine over the given catalog and configuration.
    pub fn new(catalog: AchievementCatalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// The catalog this engine evaluates.
    pub fn catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    /// Creates records for catalog entries that have none yet.
    ///
    /// Seeding is idempotent: entries already present in `existing` (keyed
    /// by catalog id) are skipped, so calling this on every startup is
    /// safe. Returns only the newly created records, locked and at zero
    /// progress, for the caller to persist.
    pub fn seed(&self, existing: &[Achievement]) -> Vec<Achievement> {
        let known: std::collections::HashSet<&str> =
            existing.iter().map(|a| a.catalog_id.as_str()).collect();

        self.catalog
            .entries()
            .iter()
            .filter(|entry| !known.contains(entry.id.as_str()))
            .map(|entry| Achievement {
                id: Uuid::new_v4(),
                catalog_id: entry.id.clone(),
                name: entry.name.clone(),
                description: entry.description.clone(),
                icon_name: entry.icon_name.clone(),
                category: entry.category,
                rarity: entry.rarity,
                points: entry.points,
                progress: Decimal::ZERO,
                max_progress: entry.requirement.target(),
                is_unlocked: false,
                unlocked_at: None,
            })
            .collect()
    }

    /// Scores every achievement record against the history.
    ///
    /// Locked records get `progress = min(aggregate, max_progress)` and
    /// unlock exactly when the aggregate reaches the target; `unlocked_at`
    /// is stamped with `now` on that transition only. Unlocked records pass
    /// through untouched, which is what makes the unlock monotonic and the
    /// whole pass re-run-safe. Records whose catalog entry has disappeared
    /// (a trimmed custom catalog) also pass through untouched.
    ///
    /// # Arguments
    ///
    /// * `shifts` - The full shift history
    /// * `jobs` - All jobs on record
    /// * `bonuses` - All job catalog bonuses
    /// * `achievements` - The current achievement records
    /// * `now` - Timestamp for any unlocks this pass produces
    pub fn evaluate(
        &self,
        shifts: &[Shift],
        jobs: &[Job],
        bonuses: &[Bonus],
        achievements: &[Achievement],
        now: DateTime<Utc>,
    ) -> Evaluation {
        let aggregates = aggregate_history(shifts, jobs, bonuses, &self.config);

        let mut updated = Vec::with_capacity(achievements.len());
        let mut newly_unlocked = Vec::new();

        for record in achievements {
            if record.is_unlocked {
                updated.push(record.clone());
                continue;
            }

            let Some(entry) = self.catalog.get(&record.catalog_id) else {
                warn!(catalog_id = %record.catalog_id, "achievement record has no catalog entry");
                updated.push(record.clone());
                continue;
            };

            let measure = entry.requirement.measure(&aggregates);
            let mut record = record.clone();

            if measure >= record.max_progress {
                record.progress = record.max_progress;
                record.is_unlocked = true;
                record.unlocked_at = Some(now);
                info!(catalog_id = %record.catalog_id, points = record.points, "achievement unlocked");
                newly_unlocked.push(record.catalog_id.clone());
            } else {
                record.progress = measure.max(Decimal::ZERO);
            }

            updated.push(record);
        }

        Evaluation {
            achievements: updated,
            newly_unlocked,
        }
    }

    /// Sorts achievements for display: unlocked first, then points
    /// descending, ties broken by catalog order.
    pub fn sort_for_display(&self, achievements: &mut [Achievement]) {
        achievements.sort_by(|a, b| {
            b.is_unlocked
                .cmp(&a.is_unlocked)
                .then_with(|| b.points.cmp(&a.points))
                .then_with(|| {
                    let ai = self.catalog.index_of(&a.catalog_id).unwrap_or(usize::MAX);
                    let bi = self.catalog.index_of(&b.catalog_id).unwrap_or(usize::MAX);
                    ai.cmp(&bi)
                })
        });
    }
}

/// Total points across unlocked achievements.
///
/// A derived read, not separately stored truth.
pub fn total_points(achievements: &[Achievement]) -> u32 {
    achievements
        .iter()
        .filter(|a| a.is_unlocked)
        .map(|a| a.points)
        .sum()
}

/// Rarity-weighted score across unlocked achievements.
pub fn weighted_score(achievements: &[Achievement]) -> u32 {
    achievements
        .iter()
        .filter(|a| a.is_unlocked)
        .map(|a| a.points * a.rarity.score_weight())
        .sum()
}

/// Groups unlocked achievements by category.
pub fn unlocked_by_category(
    achievements: &[Achievement],
) -> HashMap<AchievementCategory, Vec<&Achievement>> {
    let mut grouped: HashMap<AchievementCategory, Vec<&Achievement>> = HashMap::new();
    for achievement in achievements.iter().filter(|a| a.is_unlocked) {
        grouped.entry(achievement.category).or_default().push(achievement);
    }
    grouped
}

/// Counts unlocked achievements per rarity.
pub fn rarity_distribution(achievements: &[Achievement]) -> HashMap<AchievementRarity, usize> {
    let mut distribution: HashMap<AchievementRarity, usize> = HashMap::new();
    for achievement in achievements.iter().filter(|a| a.is_unlocked) {
        *distribution.entry(achievement.rarity).or_default() += 1;
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftType;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, h, 0, 0).unwrap()
    }

    fn engine() -> AchievementEngine {
        AchievementEngine::new(AchievementCatalog::builtin(), EngineConfig::default())
    }

    fn completed(job: &Job, start: DateTime<Utc>, hours: i64, shift_type: ShiftType) -> Shift {
        let mut shift = Shift::begin(job.id, start);
        shift.end_time = Some(start + Duration::hours(hours));
        shift.is_active = false;
        shift.shift_type = Some(shift_type);
        shift
    }

    fn by_id<'a>(achievements: &'a [Achievement], id: &str) -> &'a Achievement {
        achievements.iter().find(|a| a.catalog_id == id).unwrap()
    }

    #[test]
    fn test_seed_creates_all_records_once() {
        let engine = engine();

        let seeded = engine.seed(&[]);
        assert_eq!(seeded.len(), 18);
        assert!(seeded.iter().all(|a| !a.is_unlocked));
        assert!(seeded.iter().all(|a| a.progress == Decimal::ZERO));
        assert!(seeded.iter().all(|a| a.max_progress > Decimal::ZERO));

        // Seeding again over the full set produces nothing new.
        assert!(engine.seed(&seeded).is_empty());
    }

    #[test]
    fn test_seed_fills_only_missing_records() {
        let engine = engine();
        let mut existing = engine.seed(&[]);
        existing.retain(|a| a.catalog_id != "first_shift");

        let seeded = engine.seed(&existing);
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].catalog_id, "first_shift");
    }

    #[test]
    fn test_first_shift_unlocks_after_one_completed_shift() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let shifts = vec![completed(&job, at(5, 9), 8, ShiftType::Regular)];
        let records = engine.seed(&[]);

        let evaluation = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &records,
            at(5, 17),
        );

        let first_shift = by_id(&evaluation.achievements, "first_shift");
        assert!(first_shift.is_unlocked);
        assert_eq!(first_shift.progress, first_shift.max_progress);
        assert_eq!(first_shift.unlocked_at, Some(at(5, 17)));
        assert!(evaluation.newly_unlocked.contains(&"first_shift".to_string()));
    }

    /// 100 tracked hours unlock the 100-hour milestone exactly at the bar.
    #[test]
    fn test_hundred_hours_unlocks_marathon_worker() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        // 12 shifts of 8h = 96 hours, plus one 4h shift = 100.
        let mut shifts: Vec<Shift> = (0..12u32)
            .map(|i| completed(&job, at(2 + i, 9), 8, ShiftType::Regular))
            .collect();
        shifts.push(completed(&job, at(20, 9), 4, ShiftType::Flexible));
        let records = engine.seed(&[]);

        let evaluation = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &records,
            at(20, 17),
        );

        let marathon = by_id(&evaluation.achievements, "marathon_worker");
        assert!(marathon.is_unlocked);
        assert_eq!(marathon.progress, dec("100"));
    }

    #[test]
    fn test_progress_below_target_is_reported_and_capped() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let shifts = vec![completed(&job, at(5, 9), 6, ShiftType::Regular)];
        let records = engine.seed(&[]);

        let evaluation = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &records,
            at(5, 15),
        );

        let time_tracker = by_id(&evaluation.achievements, "time_tracker");
        assert!(!time_tracker.is_unlocked);
        assert_eq!(time_tracker.progress, dec("6"));
        assert!(time_tracker.unlocked_at.is_none());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let shifts = vec![
            completed(&job, at(5, 9), 9, ShiftType::Overtime),
            completed(&job, at(6, 9), 8, ShiftType::Regular),
        ];
        let records = engine.seed(&[]);

        let first = engine.evaluate(&shifts, std::slice::from_ref(&job), &[], &records, at(6, 17));
        let second = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &first.achievements,
            at(7, 17),
        );

        assert_eq!(first.achievements, second.achievements);
        assert!(second.newly_unlocked.is_empty());
    }

    #[test]
    fn test_unlock_is_monotonic_under_history_shrinkage() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let shifts = vec![completed(&job, at(5, 9), 8, ShiftType::Regular)];
        let records = engine.seed(&[]);

        let unlocked = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &records,
            at(5, 17),
        );
        assert!(by_id(&unlocked.achievements, "first_shift").is_unlocked);

        // The only shift is deleted; the unlock must survive.
        let after_delete = engine.evaluate(
            &[],
            std::slice::from_ref(&job),
            &[],
            &unlocked.achievements,
            at(6, 17),
        );

        let first_shift = by_id(&after_delete.achievements, "first_shift");
        assert!(first_shift.is_unlocked);
        assert_eq!(first_shift.unlocked_at, Some(at(5, 17)));
        assert!(first_shift.progress >= first_shift.max_progress);
    }

    #[test]
    fn test_unknown_catalog_id_passes_through() {
        let engine = engine();
        let mut records = engine.seed(&[]);
        records[0].catalog_id = "retired_achievement".to_string();
        records[0].progress = dec("3");

        let evaluation = engine.evaluate(&[], &[], &[], &records, at(5, 17));

        let orphan = by_id(&evaluation.achievements, "retired_achievement");
        assert_eq!(orphan.progress, dec("3"));
        assert!(!orphan.is_unlocked);
    }

    #[test]
    fn test_getting_started_unlocks_on_first_job() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let records = engine.seed(&[]);

        let evaluation =
            engine.evaluate(&[], std::slice::from_ref(&job), &[], &records, at(1, 0));

        assert!(by_id(&evaluation.achievements, "getting_started").is_unlocked);
        assert!(!by_id(&evaluation.achievements, "multi_tasker").is_unlocked);
    }

    #[test]
    fn test_overtime_hero_counts_overtime_shifts_only() {
        let engine = engine();
        let job = Job::new("Nurse", dec("30.00"), at(1, 0));
        let mut shifts: Vec<Shift> = (0..10u32)
            .map(|i| completed(&job, at(2 + i, 8), 9, ShiftType::Overtime))
            .collect();
        shifts.push(completed(&job, at(15, 9), 8, ShiftType::Regular));
        let records = engine.seed(&[]);

        let evaluation = engine.evaluate(
            &shifts,
            std::slice::from_ref(&job),
            &[],
            &records,
            at(15, 17),
        );

        assert!(by_id(&evaluation.achievements, "overtime_hero").is_unlocked);
    }

    #[test]
    fn test_display_sort_contract() {
        let engine = engine();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        let shifts = vec![completed(&job, at(5, 9), 8, ShiftType::Regular)];
        let records = engine.seed(&[]);

        let mut achievements = engine
            .evaluate(&shifts, std::slice::from_ref(&job), &[], &records, at(5, 17))
            .achievements;
        engine.sort_for_display(&mut achievements);

        // All unlocked records come before all locked records.
        let first_locked = achievements
            .iter()
            .position(|a| !a.is_unlocked)
            .unwrap();
        assert!(achievements[..first_locked].iter().all(|a| a.is_unlocked));
        assert!(achievements[first_locked..].iter().all(|a| !a.is_unlocked));

        // Within each partition, points never increase.
        for window in achievements[..first_locked].windows(2) {
            assert!(window[0].points >= window[1].points);
        }
        for window in achievements[first_locked..].windows(2) {
            assert!(window[0].points >= window[1].points);
        }

        // Equal points fall back to catalog order.
        let tied: Vec<&Achievement> = achievements
            .iter()
            .filter(|a| !a.is_unlocked && a.points == 150)
            .collect();
        let indices: Vec<usize> = tied
            .iter()
            .map(|a| engine.catalog().index_of(&a.catalog_id).unwrap())
            .collect();
        let mut sorted_indices = indices.clone();
        sorted_indices.sort_unstable();
        assert_eq!(indices, sorted_indices);
    }

    #[test]
    fn test_total_points_sums_unlocked_only() {
        let engine = engine();
        let mut records = engine.seed(&[]);
        assert_eq!(total_points(&records), 0);

        // first_shift (10) and getting_started (5).
        for record in records.iter_mut() {
            if record.catalog_id == "first_shift" || record.catalog_id == "getting_started" {
                record.is_unlocked = true;
                record.progress = record.max_progress;
            }
        }

        assert_eq!(total_points(&records), 15);
    }

    #[test]
    fn test_weighted_score_applies_rarity_weights() {
        let engine = engine();
        let mut records = engine.seed(&[]);

        // half_thousand: 250 points, legendary (weight 5).
        for record in records.iter_mut() {
            if record.catalog_id == "half_thousand" {
                record.is_unlocked = true;
                record.progress = record.max_progress;
            }
        }

        assert_eq!(weighted_score(&records), 1250);
    }

    #[test]
    fn test_rarity_distribution_counts_unlocked() {
        let engine = engine();
        let mut records = engine.seed(&[]);
        for record in records.iter_mut() {
            if record.catalog_id == "first_shift" || record.catalog_id == "first_dollar" {
                record.is_unlocked = true;
                record.progress = record.max_progress;
            }
        }

        let distribution = rarity_distribution(&records);
        assert_eq!(distribution.get(&AchievementRarity::Common), Some(&2));
        assert_eq!(distribution.get(&AchievementRarity::Epic), None);
    }

    #[test]
    fn test_unlocked_by_category_groups() {
        let engine = engine();
        let mut records = engine.seed(&[]);
        for record in records.iter_mut() {
            if record.category == AchievementCategory::FirstSteps {
                record.is_unlocked = true;
                record.progress = record.max_progress;
            }
        }

        let grouped = unlocked_by_category(&records);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&AchievementCategory::FirstSteps].len(), 2);
    }
}
