//! History aggregation.
//!
//! A single pass over the shift history producing every rollup the rest of
//! the system reads: totals for display, and the aggregate values the
//! achievement engine scores against. Consolidating these here replaces the
//! per-screen recomputation that tends to accumulate in presentation code.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{Bonus, Job, Shift, ShiftType};

use super::earnings::compute_earnings;

/// Cumulative rollups over a shift history.
///
/// Only completed shifts count; an in-progress shift has no final duration,
/// type, or earnings yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShiftAggregates {
    /// Number of completed shifts.
    pub shift_count: u64,
    /// Total hours across completed shifts.
    pub total_hours: Decimal,
    /// Total earnings (base + bonus) across completed shifts.
    pub total_earnings: Decimal,
    /// Total ad-hoc shift bonuses.
    pub bonus_total: Decimal,
    /// Number of completed shifts classified Overtime.
    pub overtime_shift_count: u64,
    /// Number of jobs on record.
    pub job_count: u64,
    /// Longest run of consecutive calendar days with at least one shift.
    pub longest_day_streak: u32,
    /// Longest run of consecutive ISO weeks with at least one shift.
    pub longest_week_streak: u32,
    /// Longest run of consecutive calendar months with at least one shift.
    pub longest_month_streak: u32,
}

/// Aggregates a full shift history.
///
/// Deterministic in its inputs: completed shifts are priced with their own
/// end times, so the same history always produces the same aggregates.
/// Shifts whose job has been deleted contribute their hours and ad-hoc
/// bonus but no base earnings.
///
/// # Arguments
///
/// * `shifts` - The full shift history (active shifts are skipped)
/// * `jobs` - All jobs on record
/// * `bonuses` - All job catalog bonuses (only priced in when
///   [`EngineConfig::include_job_bonuses`] is set)
/// * `config` - Multipliers and policy switches
pub fn aggregate_history(
    shifts: &[Shift],
    jobs: &[Job],
    bonuses: &[Bonus],
    config: &EngineConfig,
) -> ShiftAggregates {
    let jobs_by_id: HashMap<Uuid, &Job> = jobs.iter().map(|j| (j.id, j)).collect();
    let mut bonuses_by_job: HashMap<Uuid, Vec<Bonus>> = HashMap::new();
    for bonus in bonuses {
        bonuses_by_job
            .entry(bonus.job_id)
            .or_default()
            .push(bonus.clone());
    }
    let no_bonuses: Vec<Bonus> = Vec::new();

    let mut aggregates = ShiftAggregates {
        job_count: jobs.len() as u64,
        ..ShiftAggregates::default()
    };

    let mut worked_dates: Vec<NaiveDate> = Vec::new();

    for shift in shifts.iter().filter(|s| s.is_completed()) {
        // is_completed guarantees end_time is set.
        let end = shift.end_time.unwrap_or(shift.start_time);

        let job = shift.job_id.and_then(|id| jobs_by_id.get(&id).copied());
        let job_bonuses = shift
            .job_id
            .and_then(|id| bonuses_by_job.get(&id))
            .unwrap_or(&no_bonuses);

        let breakdown = compute_earnings(shift, job, job_bonuses, end, config);

        aggregates.shift_count += 1;
        aggregates.total_hours += shift.duration_hours(end);
        aggregates.total_earnings += breakdown.total_earnings;
        aggregates.bonus_total += shift.bonus_amount;
        if shift.shift_type == Some(ShiftType::Overtime) {
            aggregates.overtime_shift_count += 1;
        }

        worked_dates.push(shift.start_time.date_naive());
    }

    worked_dates.sort_unstable();
    worked_dates.dedup();

    aggregates.longest_day_streak = longest_run(&worked_dates, |a, b| *b - *a == Duration::days(1));

    let mut week_starts: Vec<NaiveDate> = worked_dates.iter().map(|d| week_start(*d)).collect();
    week_starts.dedup();
    aggregates.longest_week_streak =
        longest_run(&week_starts, |a, b| *b - *a == Duration::days(7));

    let mut months: Vec<i32> = worked_dates.iter().map(|d| month_index(*d)).collect();
    months.dedup();
    aggregates.longest_month_streak = longest_run(&months, |a, b| b - a == 1);

    aggregates
}

/// The Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Months since year zero, for adjacency checks across year boundaries.
fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Length of the longest run of adjacent elements in a sorted, deduped
/// slice.
fn longest_run<T>(sorted: &[T], adjacent: impl Fn(&T, &T) -> bool) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let mut longest = 1u32;
    let mut current = 1u32;
    for pair in sorted.windows(2) {
        if adjacent(&pair[0], &pair[1]) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}
