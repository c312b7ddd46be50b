//! Earnings calculation.
//!
//! This module maps a shift, its job's rate, and its bonuses to a monetary
//! breakdown. The computation is pure and total: it never errors and never
//! produces a non-finite value. A shift whose job is missing (deleted and
//! detached) contributes zero base earnings rather than failing, so one bad
//! record can never take down the aggregate pipeline feeding lists and
//! analytics.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::models::{Bonus, Job, Shift};

/// The monetary breakdown of a single shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    /// Duration × hourly rate × shift-type multiplier.
    pub base_earnings: Decimal,
    /// The shift's ad-hoc bonus, plus the job's catalog bonuses when the
    /// engine is configured to include them.
    pub bonus_earnings: Decimal,
    /// `base_earnings + bonus_earnings`.
    pub total_earnings: Decimal,
}

impl EarningsBreakdown {
    /// A breakdown with every component zero.
    pub fn zero() -> Self {
        Self {
            base_earnings: Decimal::ZERO,
            bonus_earnings: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
        }
    }

    /// Returns the breakdown rounded to cents for display.
    ///
    /// Midpoints round away from zero, the usual convention for currency.
    pub fn rounded(&self) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            base_earnings: round(self.base_earnings),
            bonus_earnings: round(self.bonus_earnings),
            total_earnings: round(self.total_earnings),
        }
    }
}

/// Computes the earnings breakdown for a shift.
///
/// `duration_hours` is `max(0, (end_time ?? now) - start_time)`; an active
/// shift is priced with `now` as a provisional end for live display only.
/// The base is `duration_hours × job.hourly_rate × multiplier`, where the
/// multiplier comes from the shift's type via
/// [`RateMultipliers`](crate::config::RateMultipliers).
///
/// Bonus earnings are the shift's own `bonus_amount`; the job's catalog
/// bonuses are added only when [`EngineConfig::include_job_bonuses`] is set.
///
/// A `None` job yields zero base earnings (the shift's own bonus still
/// counts — it was money actually received). This is the degraded path for
/// shifts detached by job deletion, logged rather than surfaced as an error.
///
/// # Arguments
///
/// * `shift` - The shift to price
/// * `job` - The shift's job, if it still exists
/// * `job_bonuses` - The job's bonus catalog (ignored unless configured in)
/// * `now` - Provisional end time for an active shift
/// * `config` - Multipliers and the job-bonus inclusion switch
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use shift_engine::calculation::compute_earnings;
/// use shift_engine::config::EngineConfig;
/// use shift_engine::models::{Job, Shift, ShiftType};
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
/// let job = Job::new("Barista", Decimal::new(2000, 2), start);
/// let mut shift = Shift::begin(job.id, start);
/// shift.end_time = Some(Utc.with_ymd_and_hms(2026, 1, 15, 17, 0, 0).unwrap());
/// shift.is_active = false;
/// shift.shift_type = Some(ShiftType::Regular);
///
/// let breakdown = compute_earnings(&shift, Some(&job), &[], start, &EngineConfig::default());
/// assert_eq!(breakdown.total_earnings, Decimal::new(16000, 2)); // 160.00
/// ```
pub fn compute_earnings(
    shift: &Shift,
    job: Option<&Job>,
    job_bonuses: &[Bonus],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> EarningsBreakdown {
    let hours = shift.duration_hours(now);
    let multiplier = config.multipliers.for_type(shift.shift_type);

    let base_earnings = match job {
        Some(job) => hours * job.hourly_rate * multiplier,
        None => {
            if shift.job_id.is_some() {
                warn!(shift_id = %shift.id, "pricing shift whose job record is missing");
            }
            Decimal::ZERO
        }
    };

    let mut bonus_earnings = shift.bonus_amount;
    if config.include_job_bonuses && job.is_some() {
        bonus_earnings += job_bonuses.iter().map(|b| b.amount).sum::<Decimal>();
    }

    EarningsBreakdown {
        base_earnings,
        bonus_earnings,
        total_earnings: base_earnings + bonus_earnings,
    }
}
