//! In-memory gateway implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Achievement, Bonus, Job, Shift};

use super::{PersistenceGateway, ShiftFilter};

/// An in-memory [`PersistenceGateway`].
///
/// The reference implementation backing tests and doc examples, and a
/// reasonable default for embedding the engine without durable storage.
/// Interior mutability keeps the gateway shareable behind an `Arc`; writes
/// are serialized by a mutex, matching the engine's single-writer model.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use shift_engine::models::Job;
/// use shift_engine::store::{MemoryGateway, PersistenceGateway};
///
/// let gateway = MemoryGateway::new();
/// let job = Job::new("Barista", Decimal::new(2000, 2), Utc::now());
/// gateway.save_job(&job).unwrap();
/// assert_eq!(gateway.fetch_jobs().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: Mutex<Records>,
}

#[derive(Debug, Default)]
struct Records {
    jobs: HashMap<Uuid, Job>,
    shifts: HashMap<Uuid, Shift>,
    bonuses: HashMap<Uuid, Bonus>,
    achievements: HashMap<Uuid, Achievement>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut Records) -> T) -> EngineResult<T> {
        let mut records = self.records.lock().map_err(|_| EngineError::Persistence {
            message: "gateway mutex poisoned".to_string(),
        })?;
        Ok(f(&mut records))
    }
}

impl PersistenceGateway for MemoryGateway {
    fn save_job(&self, job: &Job) -> EngineResult<Uuid> {
        self.with_records(|r| {
            r.jobs.insert(job.id, job.clone());
            job.id
        })
    }

    fn save_shift(&self, shift: &Shift) -> EngineResult<Uuid> {
        self.with_records(|r| {
            r.shifts.insert(shift.id, shift.clone());
            shift.id
        })
    }

    fn save_bonus(&self, bonus: &Bonus) -> EngineResult<Uuid> {
        self.with_records(|r| {
            r.bonuses.insert(bonus.id, bonus.clone());
            bonus.id
        })
    }

    fn save_achievement(&self, achievement: &Achievement) -> EngineResult<Uuid> {
        self.with_records(|r| {
            r.achievements.insert(achievement.id, achievement.clone());
            achievement.id
        })
    }

    fn fetch_active_shift(&self) -> EngineResult<Option<Shift>> {
        self.with_records(|r| r.shifts.values().find(|s| s.is_active).cloned())
    }

    fn fetch_shifts(&self, filter: &ShiftFilter) -> EngineResult<Vec<Shift>> {
        self.with_records(|r| {
            let mut shifts: Vec<Shift> = r
                .shifts
                .values()
                .filter(|s| filter.matches(s))
                .cloned()
                .collect();
            shifts.sort_by_key(|s| s.start_time);
            shifts
        })
    }

    fn fetch_jobs(&self) -> EngineResult<Vec<Job>> {
        self.with_records(|r| {
            let mut jobs: Vec<Job> = r.jobs.values().cloned().collect();
            jobs.sort_by_key(|j| j.created_at);
            jobs
        })
    }

    fn fetch_bonuses(&self, job_id: Uuid) -> EngineResult<Vec<Bonus>> {
        self.with_records(|r| {
            let mut bonuses: Vec<Bonus> = r
                .bonuses
                .values()
                .filter(|b| b.job_id == job_id)
                .cloned()
                .collect();
            bonuses.sort_by_key(|b| b.name.clone());
            bonuses
        })
    }

    fn fetch_all_bonuses(&self) -> EngineResult<Vec<Bonus>> {
        self.with_records(|r| {
            let mut bonuses: Vec<Bonus> = r.bonuses.values().cloned().collect();
            bonuses.sort_by_key(|b| b.name.clone());
            bonuses
        })
    }

    fn fetch_achievements(&self) -> EngineResult<Vec<Achievement>> {
        self.with_records(|r| {
            let mut achievements: Vec<Achievement> = r.achievements.values().cloned().collect();
            achievements.sort_by_key(|a| a.catalog_id.clone());
            achievements
        })
    }

    fn delete_job(&self, id: Uuid) -> EngineResult<()> {
        self.with_records(|r| {
            r.jobs.remove(&id);
        })
    }

    fn delete_shift(&self, id: Uuid) -> EngineResult<()> {
        self.with_records(|r| {
            r.shifts.remove(&id);
        })
    }

    fn delete_bonus(&self, id: Uuid) -> EngineResult<()> {
        self.with_records(|r| {
            r.bonuses.remove(&id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, h, 0, 0).unwrap()
    }

    #[test]
    fn test_save_is_upsert() {
        let gateway = MemoryGateway::new();
        let mut job = Job::new("Barista", dec("20.00"), at(1, 0));
        gateway.save_job(&job).unwrap();

        job.hourly_rate = dec("22.00");
        gateway.save_job(&job).unwrap();

        let jobs = gateway.fetch_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].hourly_rate, dec("22.00"));
    }

    #[test]
    fn test_fetch_active_shift() {
        let gateway = MemoryGateway::new();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));

        assert_eq!(gateway.fetch_active_shift().unwrap(), None);

        let active = Shift::begin(job.id, at(5, 9));
        gateway.save_shift(&active).unwrap();

        let found = gateway.fetch_active_shift().unwrap().unwrap();
        assert_eq!(found.id, active.id);
    }

    #[test]
    fn test_fetch_shifts_ordered_by_start_time() {
        let gateway = MemoryGateway::new();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));

        for day in [7, 5, 6] {
            let mut shift = Shift::begin(job.id, at(day, 9));
            shift.end_time = Some(at(day, 17));
            shift.is_active = false;
            gateway.save_shift(&shift).unwrap();
        }

        let shifts = gateway.fetch_shifts(&ShiftFilter::all()).unwrap();
        let days: Vec<u32> = shifts
            .iter()
            .map(|s| {
                use chrono::Datelike;
                s.start_time.day()
            })
            .collect();
        assert_eq!(days, vec![5, 6, 7]);
    }

    #[test]
    fn test_fetch_bonuses_scoped_to_job() {
        let gateway = MemoryGateway::new();
        let a = Job::new("Barista", dec("20.00"), at(1, 0));
        let b = Job::new("Tutor", dec("35.00"), at(2, 0));

        gateway
            .save_bonus(&Bonus::new("Weekend loading", dec("15.00"), a.id))
            .unwrap();
        gateway
            .save_bonus(&Bonus::new("Exam prep", dec("20.00"), b.id))
            .unwrap();

        let bonuses = gateway.fetch_bonuses(a.id).unwrap();
        assert_eq!(bonuses.len(), 1);
        assert_eq!(bonuses[0].name, "Weekend loading");

        assert_eq!(gateway.fetch_all_bonuses().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_removes_record() {
        let gateway = MemoryGateway::new();
        let job = Job::new("Barista", dec("20.00"), at(1, 0));
        gateway.save_job(&job).unwrap();

        gateway.delete_job(job.id).unwrap();
        assert!(gateway.fetch_jobs().unwrap().is_empty());

        // Deleting a missing record is a no-op, not an error.
        assert!(gateway.delete_job(job.id).is_ok());
    }
}
