//! Persistence gateway contract.
//!
//! The engine owns no storage; it reads and writes records through the
//! [`PersistenceGateway`] trait. The exact storage format is the
//! implementor's concern — Core Data, SQLite, flat files, whatever the host
//! application uses. [`MemoryGateway`] is the in-process reference
//! implementation used by tests and doc examples.
//!
//! All gateway failures surface as
//! [`EngineError::Persistence`](crate::error::EngineError::Persistence);
//! the engine never retries on its own (retry policy belongs to the
//! gateway or the layer above it).

mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Achievement, Bonus, Job, Shift};

pub use memory::MemoryGateway;

/// Criteria for fetching shifts.
///
/// The default filter matches everything. Build it up with the chainable
/// constructors:
///
/// ```
/// use shift_engine::store::ShiftFilter;
/// use uuid::Uuid;
///
/// let job_id = Uuid::new_v4();
/// let filter = ShiftFilter::all().for_job(job_id).completed_only();
/// assert_eq!(filter.job_id, Some(job_id));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftFilter {
    /// Only shifts worked under this job.
    pub job_id: Option<Uuid>,
    /// Only completed (ended, inactive) shifts.
    pub completed: bool,
    /// Only shifts starting at or after this instant.
    pub started_after: Option<DateTime<Utc>>,
    /// Only shifts starting before this instant.
    pub started_before: Option<DateTime<Utc>>,
}

impl ShiftFilter {
    /// A filter matching every shift.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the filter to one job.
    pub fn for_job(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Restricts the filter to completed shifts.
    pub fn completed_only(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Restricts the filter to shifts starting at or after `instant`.
    pub fn started_after(mut self, instant: DateTime<Utc>) -> Self {
        self.started_after = Some(instant);
        self
    }

    /// Restricts the filter to shifts starting before `instant`.
    pub fn started_before(mut self, instant: DateTime<Utc>) -> Self {
        self.started_before = Some(instant);
        self
    }

    /// Returns true if the shift satisfies every criterion.
    pub fn matches(&self, shift: &Shift) -> bool {
        if let Some(job_id) = self.job_id {
            if shift.job_id != Some(job_id) {
                return false;
            }
        }
        if self.completed && !shift.is_completed() {
            return false;
        }
        if let Some(after) = self.started_after {
            if shift.start_time < after {
                return false;
            }
        }
        if let Some(before) = self.started_before {
            if shift.start_time >= before {
                return false;
            }
        }
        true
    }
}

/// Durable store for the engine's records.
///
/// Saves are upserts keyed by record id and return the id. Fetches return
/// owned copies; the gateway is the source of truth between calls.
/// Deleting a job removes only the job record — cascade policy for its
/// bonuses and shifts lives in the tracker, where it is explicit and
/// testable.
pub trait PersistenceGateway: Send + Sync {
    /// Inserts or updates a job.
    fn save_job(&self, job: &Job) -> EngineResult<Uuid>;

    /// Inserts or updates a shift.
    fn save_shift(&self, shift: &Shift) -> EngineResult<Uuid>;

    /// Inserts or updates a bonus.
    fn save_bonus(&self, bonus: &Bonus) -> EngineResult<Uuid>;

    /// Inserts or updates an achievement record.
    fn save_achievement(&self, achievement: &Achievement) -> EngineResult<Uuid>;

    /// Returns the active shift, if one exists.
    fn fetch_active_shift(&self) -> EngineResult<Option<Shift>>;

    /// Returns shifts matching the filter, ordered by start time.
    fn fetch_shifts(&self, filter: &ShiftFilter) -> EngineResult<Vec<Shift>>;

    /// Returns all jobs, ordered by creation time.
    fn fetch_jobs(&self) -> EngineResult<Vec<Job>>;

    /// Returns the bonus catalog of one job.
    fn fetch_bonuses(&self, job_id: Uuid) -> EngineResult<Vec<Bonus>>;

    /// Returns all bonuses across jobs.
    fn fetch_all_bonuses(&self) -> EngineResult<Vec<Bonus>>;

    /// Returns all achievement records.
    fn fetch_achievements(&self) -> EngineResult<Vec<Achievement>>;

    /// Removes a job record.
    fn delete_job(&self, id: Uuid) -> EngineResult<()>;

    /// Removes a shift record.
    fn delete_shift(&self, id: Uuid) -> EngineResult<()>;

    /// Removes a bonus record.
    fn delete_bonus(&self, id: Uuid) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, h, 0, 0).unwrap()
    }

    fn completed_shift(job_id: Uuid, day: u32) -> Shift {
        let mut shift = Shift::begin(job_id, at(day, 9));
        shift.end_time = Some(at(day, 17));
        shift.is_active = false;
        shift
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = ShiftFilter::all();
        let active = Shift::begin(Uuid::new_v4(), at(5, 9));
        let done = completed_shift(Uuid::new_v4(), 5);

        assert!(filter.matches(&active));
        assert!(filter.matches(&done));
    }

    #[test]
    fn test_job_filter() {
        let job_id = Uuid::new_v4();
        let filter = ShiftFilter::all().for_job(job_id);

        assert!(filter.matches(&completed_shift(job_id, 5)));
        assert!(!filter.matches(&completed_shift(Uuid::new_v4(), 5)));

        let mut detached = completed_shift(job_id, 5);
        detached.job_id = None;
        assert!(!filter.matches(&detached));
    }

    #[test]
    fn test_completed_filter_excludes_active() {
        let filter = ShiftFilter::all().completed_only();

        assert!(filter.matches(&completed_shift(Uuid::new_v4(), 5)));
        assert!(!filter.matches(&Shift::begin(Uuid::new_v4(), at(5, 9))));
    }

    #[test]
    fn test_time_window_is_half_open() {
        let filter = ShiftFilter::all()
            .started_after(at(5, 9))
            .started_before(at(7, 9));

        assert!(filter.matches(&completed_shift(Uuid::new_v4(), 5))); // at lower bound
        assert!(filter.matches(&completed_shift(Uuid::new_v4(), 6)));
        assert!(!filter.matches(&completed_shift(Uuid::new_v4(), 7))); // at upper bound
        assert!(!filter.matches(&completed_shift(Uuid::new_v4(), 4)));
    }
}
