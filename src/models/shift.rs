//! Shift model and related types.
//!
//! This module defines the Shift struct for representing a single work
//! session and the ShiftType enum that drives the pay-rate multiplier.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a shift, driving the pay-rate multiplier.
///
/// Regular and Flexible shifts pay the base rate; Overtime pays 1.5x and
/// SpecialEvent 1.25x (multipliers are configurable, see
/// [`crate::config::RateMultipliers`]). Regular, Overtime, and Flexible are
/// derived from the final duration when a shift completes; SpecialEvent is
/// only ever assigned manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// A standard shift (6 to 8 hours).
    Regular,
    /// A long shift (more than 8 hours), paid at the overtime multiplier.
    Overtime,
    /// A manually flagged special event shift, paid at its own multiplier.
    SpecialEvent,
    /// A short shift (under 6 hours).
    Flexible,
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ShiftType::Regular => "Regular",
            ShiftType::Overtime => "Overtime",
            ShiftType::SpecialEvent => "Special Event",
            ShiftType::Flexible => "Flexible",
        };
        write!(f, "{}", label)
    }
}

/// Represents a single work session tied to one job.
///
/// A shift is created when tracking starts (or entered manually) and is
/// completed when tracking ends. While active it has no end time and no
/// shift type; both are assigned at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: Uuid,
    /// The job this shift was worked under. `None` once the owning job has
    /// been deleted under the detach policy.
    pub job_id: Option<Uuid>,
    /// When the shift started.
    pub start_time: DateTime<Utc>,
    /// When the shift ended. `None` while the shift is active.
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the shift is currently being tracked.
    pub is_active: bool,
    /// The classification assigned at completion. `None` while active.
    pub shift_type: Option<ShiftType>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Ad-hoc bonus for this shift, distinct from the job's bonus catalog.
    /// Never negative.
    pub bonus_amount: Decimal,
}

impl Shift {
    /// Creates a new active shift starting now for the given job.
    pub fn begin(job_id: Uuid, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id: Some(job_id),
            start_time,
            end_time: None,
            is_active: true,
            shift_type: None,
            notes: None,
            bonus_amount: Decimal::ZERO,
        }
    }

    /// Returns the duration of the shift.
    ///
    /// An active shift uses `now` as a provisional end for live display;
    /// the provisional value is never persisted. A negative span (clock
    /// skew, bad edit) clamps to zero.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(Duration::zero())
    }

    /// Returns the duration of the shift in hours as a Decimal.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    /// use shift_engine::models::Shift;
    /// use uuid::Uuid;
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
    /// let mut shift = Shift::begin(Uuid::new_v4(), start);
    /// shift.end_time = Some(Utc.with_ymd_and_hms(2026, 1, 15, 17, 0, 0).unwrap());
    /// shift.is_active = false;
    ///
    /// assert_eq!(shift.duration_hours(start), Decimal::new(80, 1)); // 8.0
    /// ```
    pub fn duration_hours(&self, now: DateTime<Utc>) -> Decimal {
        let seconds = self.duration(now).num_seconds();
        Decimal::new(seconds, 0) / Decimal::new(3600, 0)
    }

    /// Returns true if the shift has ended and is no longer active.
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some() && !self.is_active
    }
}
