//! The shift tracker.
//!
//! [`ShiftTracker`] is the stateful heart of the engine: a two-state
//! machine (Idle, Tracking) owning the single active-shift slot. It
//! orchestrates the pure calculation and achievement modules, persists at
//! every transition point, and exposes the pull-based queries and optional
//! change-notification hook the presentation layer consumes.
//!
//! The tracker is an explicit service instance constructed with injected
//! gateway and clock dependencies; there is no global shared instance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::achievements::{AchievementCatalog, AchievementEngine, total_points};
use crate::calculation::{
    EarningsBreakdown, ShiftAggregates, aggregate_history, classify_shift_type, compute_earnings,
};
use crate::config::{EngineConfig, JobDeletePolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{Achievement, Bonus, Job, Shift, ShiftType};
use crate::store::{PersistenceGateway, ShiftFilter};

use super::clock::Clock;

/// The tracker's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// No active shift.
    Idle,
    /// One shift is in progress.
    Tracking,
}

/// A change notification from the tracker.
///
/// Subscribers receive events synchronously after the corresponding state
/// has been persisted. This is the engine's only push surface; everything
/// else is a pull-based query.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A shift started tracking.
    TrackingStarted {
        /// The new active shift.
        shift_id: Uuid,
        /// The job being worked.
        job_id: Uuid,
    },
    /// The active shift completed.
    TrackingEnded {
        /// The completed shift.
        shift_id: Uuid,
        /// Its final earnings.
        earnings: EarningsBreakdown,
    },
    /// Jobs or bonuses were added, edited, or deleted.
    JobsChanged,
    /// Shift history changed outside the start/end flow.
    ShiftsChanged,
    /// Achievements unlocked in the latest evaluation.
    AchievementsUnlocked {
        /// Catalog ids of the new unlocks.
        catalog_ids: Vec<String>,
    },
}

/// A subscriber callback for [`EngineEvent`]s.
pub type ChangeListener = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// The result of ending a tracked shift.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedShift {
    /// The completed, persisted shift.
    pub shift: Shift,
    /// Its final earnings breakdown.
    pub earnings: EarningsBreakdown,
    /// Catalog ids of achievements this completion unlocked.
    pub newly_unlocked: Vec<String>,
}

/// Stateful engine owning at most one active shift.
///
/// All mutating operations validate before touching state, persist at the
/// transition point, and leave in-memory state consistent with the last
/// successful save when the gateway fails. Start and end are serialized by
/// an internal lock, so a concurrent second `start_tracking` observes the
/// Tracking state and fails cleanly instead of creating a second active
/// shift.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::{Duration, TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use shift_engine::achievements::AchievementCatalog;
/// use shift_engine::config::EngineConfig;
/// use shift_engine::models::ShiftType;
/// use shift_engine::store::MemoryGateway;
/// use shift_engine::tracker::{ManualClock, ShiftTracker};
///
/// let clock = Arc::new(ManualClock::new(
///     Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
/// ));
/// let tracker = ShiftTracker::new(
///     Arc::new(MemoryGateway::new()),
///     Arc::clone(&clock),
///     EngineConfig::default(),
///     AchievementCatalog::builtin(),
/// )?;
/// tracker.initialize()?;
///
/// let job = tracker.add_job("Barista", Decimal::new(2000, 2))?;
/// tracker.start_tracking(job.id)?;
/// clock.advance(Duration::hours(8));
/// let completed = tracker.end_tracking()?;
///
/// assert_eq!(completed.shift.shift_type, Some(ShiftType::Regular));
/// assert_eq!(completed.earnings.total_earnings, Decimal::new(16000, 2));
/// # Ok::<(), shift_engine::error::EngineError>(())
/// ```
pub struct ShiftTracker<G: PersistenceGateway, C: Clock> {
    gateway: Arc<G>,
    clock: Arc<C>,
    config: EngineConfig,
    achievement_engine: AchievementEngine,
    active: Mutex<Option<Shift>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl<G: PersistenceGateway, C: Clock> ShiftTracker<G, C> {
    /// Creates a tracker over the given gateway, clock, configuration, and
    /// achievement catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the configuration is
    /// internally inconsistent.
    pub fn new(
        gateway: Arc<G>,
        clock: Arc<C>,
        config: EngineConfig,
        catalog: AchievementCatalog,
    ) -> EngineResult<Self> {
        config.validate()?;
        let achievement_engine = AchievementEngine::new(catalog, config.clone());
        Ok(Self {
            gateway,
            clock,
            config,
            achievement_engine,
            active: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Seeds achievement records and recovers a persisted active shift.
    ///
    /// Seeding is idempotent, so calling this on every startup is safe. If
    /// a crash left an active shift in the store, it is picked back up into
    /// the Tracking state rather than orphaned.
    pub fn initialize(&self) -> EngineResult<()> {
        let existing = self.gateway.fetch_achievements()?;
        for record in self.achievement_engine.seed(&existing) {
            self.gateway.save_achievement(&record)?;
        }

        if let Some(recovered) = self.gateway.fetch_active_shift()? {
            info!(shift_id = %recovered.id, "recovered active shift from store");
            *self.lock_active() = Some(recovered);
        }
        Ok(())
    }

    /// The current state: Idle or Tracking.
    pub fn status(&self) -> TrackerStatus {
        if self.lock_active().is_some() {
            TrackerStatus::Tracking
        } else {
            TrackerStatus::Idle
        }
    }

    /// Returns true while a shift is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.status() == TrackerStatus::Tracking
    }

    /// A copy of the active shift, if any.
    pub fn active_shift(&self) -> Option<Shift> {
        self.lock_active().clone()
    }

    /// Starts tracking a shift for `job_id`.
    ///
    /// Valid only from Idle. The new shift is persisted immediately, so a
    /// crash mid-shift still leaves a recoverable partial record.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyTracking`] if a shift is in progress.
    /// - [`EngineError::JobNotFound`] if no such job exists.
    /// - [`EngineError::InvalidJob`] if the job has been deactivated.
    /// - [`EngineError::Persistence`] if the save fails; the tracker stays
    ///   Idle.
    pub fn start_tracking(&self, job_id: Uuid) -> EngineResult<Shift> {
        let job = self.find_workable_job(job_id)?;

        let mut slot = self.lock_active();
        if let Some(active) = slot.as_ref() {
            return Err(EngineError::AlreadyTracking {
                shift_id: active.id,
            });
        }

        let shift = Shift::begin(job.id, self.clock.now());
        self.gateway.save_shift(&shift)?;
        *slot = Some(shift.clone());
        drop(slot);

        info!(shift_id = %shift.id, job = %job.name, "tracking started");
        self.emit(&EngineEvent::TrackingStarted {
            shift_id: shift.id,
            job_id: job.id,
        });
        Ok(shift)
    }

    /// Recomputes the elapsed time of the active shift.
    ///
    /// For display only: no state changes, no persistence. Returns `None`
    /// when Idle. Intended to be driven by a periodic timer (once per
    /// second is the design target) owned by the caller.
    pub fn tick(&self) -> Option<Duration> {
        let slot = self.lock_active();
        slot.as_ref().map(|shift| shift.duration(self.clock.now()))
    }

    /// Ends the active shift.
    ///
    /// Sets the end time, derives the shift type from the final duration,
    /// computes earnings, persists the completed shift, and then runs
    /// achievement evaluation.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotTracking`] if no shift is in progress.
    /// - [`EngineError::Persistence`] if the shift save fails; the tracker
    ///   stays Tracking with the in-memory shift unchanged. If the save
    ///   succeeds but an achievement write fails, the error propagates with
    ///   the completed shift already persisted; a later
    ///   [`refresh_achievements`](Self::refresh_achievements) catches the
    ///   records up.
    pub fn end_tracking(&self) -> EngineResult<CompletedShift> {
        let mut slot = self.lock_active();
        let active = slot.as_ref().ok_or(EngineError::NotTracking)?;

        let now = self.clock.now();
        let mut completed = active.clone();
        completed.end_time = Some(now);
        completed.is_active = false;
        completed.shift_type = Some(classify_shift_type(
            completed.duration_hours(now),
            &self.config.thresholds,
        ));

        let job = match completed.job_id {
            Some(id) => self.find_job(id)?,
            None => None,
        };
        let job_bonuses = match &job {
            Some(job) => self.gateway.fetch_bonuses(job.id)?,
            None => Vec::new(),
        };
        let earnings = compute_earnings(&completed, job.as_ref(), &job_bonuses, now, &self.config);

        self.gateway.save_shift(&completed)?;
        *slot = None;
        drop(slot);

        info!(
            shift_id = %completed.id,
            shift_type = %completed.shift_type.map(|t| t.to_string()).unwrap_or_default(),
            total = %earnings.total_earnings,
            "tracking ended"
        );
        self.emit(&EngineEvent::TrackingEnded {
            shift_id: completed.id,
            earnings,
        });

        let newly_unlocked = self.run_achievement_evaluation()?;
        Ok(CompletedShift {
            shift: completed,
            earnings,
            newly_unlocked,
        })
    }

    /// Creates a job.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidJob`] for an empty name or a non-positive
    /// hourly rate; nothing is persisted on rejection.
    pub fn add_job(&self, name: &str, hourly_rate: Decimal) -> EngineResult<Job> {
        validate_job_fields(name, hourly_rate)?;

        let job = Job::new(name.trim(), hourly_rate, self.clock.now());
        self.gateway.save_job(&job)?;

        info!(job_id = %job.id, name = %job.name, "job added");
        self.emit(&EngineEvent::JobsChanged);
        self.run_achievement_evaluation()?;
        Ok(job)
    }

    /// Updates an existing job.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidJob`] on bad fields, or
    /// [`EngineError::JobNotFound`] if the job does not exist.
    pub fn update_job(&self, job: Job) -> EngineResult<Job> {
        validate_job_fields(&job.name, job.hourly_rate)?;
        if self.find_job(job.id)?.is_none() {
            return Err(EngineError::JobNotFound { id: job.id });
        }

        self.gateway.save_job(&job)?;
        self.emit(&EngineEvent::JobsChanged);
        Ok(job)
    }

    /// Deletes a job, cascading its bonuses and applying the configured
    /// shift policy.
    ///
    /// Under [`JobDeletePolicy::DetachShifts`] (the default) the job's
    /// shifts survive with their job reference cleared — history is
    /// preserved, and detached shifts earn zero going forward. Under
    /// [`JobDeletePolicy::CascadeShifts`] they are deleted with the job.
    /// Either way the active shift is included: it is detached in place or
    /// cancelled outright.
    pub fn delete_job(&self, job_id: Uuid) -> EngineResult<()> {
        let job = self
            .find_job(job_id)?
            .ok_or(EngineError::JobNotFound { id: job_id })?;

        for bonus in self.gateway.fetch_bonuses(job_id)? {
            self.gateway.delete_bonus(bonus.id)?;
        }

        let owned = self
            .gateway
            .fetch_shifts(&ShiftFilter::all().for_job(job_id))?;
        match self.config.job_delete_policy {
            JobDeletePolicy::DetachShifts => {
                for mut shift in owned {
                    shift.job_id = None;
                    self.gateway.save_shift(&shift)?;
                }
            }
            JobDeletePolicy::CascadeShifts => {
                for shift in owned {
                    self.gateway.delete_shift(shift.id)?;
                }
            }
        }

        let mut slot = self.lock_active();
        if let Some(active) = slot.as_mut() {
            if active.job_id == Some(job_id) {
                match self.config.job_delete_policy {
                    JobDeletePolicy::DetachShifts => {
                        warn!(shift_id = %active.id, "active shift detached by job deletion");
                        active.job_id = None;
                    }
                    JobDeletePolicy::CascadeShifts => {
                        warn!(shift_id = %active.id, "active shift cancelled by job deletion");
                        *slot = None;
                    }
                }
            }
        }
        drop(slot);

        self.gateway.delete_job(job_id)?;
        info!(job_id = %job_id, name = %job.name, "job deleted");
        self.emit(&EngineEvent::JobsChanged);
        self.emit(&EngineEvent::ShiftsChanged);
        self.run_achievement_evaluation()?;
        Ok(())
    }

    /// Adds a bonus to a job's catalog.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidBonus`] for an empty name or negative amount;
    /// [`EngineError::JobNotFound`] if the job does not exist.
    pub fn add_bonus(&self, job_id: Uuid, name: &str, amount: Decimal) -> EngineResult<Bonus> {
        if name.trim().is_empty() {
            return Err(EngineError::InvalidBonus {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if amount < Decimal::ZERO {
            return Err(EngineError::InvalidBonus {
                field: "amount".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.find_job(job_id)?.is_none() {
            return Err(EngineError::JobNotFound { id: job_id });
        }

        let bonus = Bonus::new(name.trim(), amount, job_id);
        self.gateway.save_bonus(&bonus)?;
        self.emit(&EngineEvent::JobsChanged);
        Ok(bonus)
    }

    /// Removes a bonus from its job's catalog.
    pub fn delete_bonus(&self, bonus_id: Uuid) -> EngineResult<()> {
        self.gateway.delete_bonus(bonus_id)?;
        self.emit(&EngineEvent::JobsChanged);
        Ok(())
    }

    /// Records a completed shift entered by hand.
    ///
    /// When `shift_type` is `None` the type is derived from the duration by
    /// the canonical rule; passing `Some` (a special event, say) overrides
    /// it.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidShift`] if the end is not after the start or
    /// the bonus is negative; [`EngineError::JobNotFound`] if the job does
    /// not exist; [`EngineError::InvalidJob`] if it has been deactivated.
    /// Nothing is persisted on rejection.
    pub fn add_manual_shift(
        &self,
        job_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        shift_type: Option<ShiftType>,
        notes: Option<String>,
        bonus_amount: Decimal,
    ) -> EngineResult<Shift> {
        validate_shift_fields(start_time, end_time, bonus_amount)?;
        self.find_workable_job(job_id)?;

        let mut shift = Shift::begin(job_id, start_time);
        shift.end_time = Some(end_time);
        shift.is_active = false;
        shift.notes = notes;
        shift.bonus_amount = bonus_amount;
        shift.shift_type = Some(shift_type.unwrap_or_else(|| {
            classify_shift_type(shift.duration_hours(end_time), &self.config.thresholds)
        }));

        self.gateway.save_shift(&shift)?;
        info!(shift_id = %shift.id, "manual shift recorded");
        self.emit(&EngineEvent::ShiftsChanged);
        self.run_achievement_evaluation()?;
        Ok(shift)
    }

    /// Updates a completed shift.
    ///
    /// # Errors
    ///
    /// [`EngineError::ShiftNotFound`] if the shift does not exist;
    /// [`EngineError::InvalidShift`] if the edit would leave a completed
    /// shift without an end time, end it before it starts, or give it a
    /// negative bonus.
    pub fn update_shift(&self, shift: Shift) -> EngineResult<Shift> {
        let Some(end_time) = shift.end_time else {
            return Err(EngineError::InvalidShift {
                field: "end_time".to_string(),
                message: "completed shift must have an end time".to_string(),
            });
        };
        validate_shift_fields(shift.start_time, end_time, shift.bonus_amount)?;

        let known = self.gateway.fetch_shifts(&ShiftFilter::all())?;
        if !known.iter().any(|s| s.id == shift.id) {
            return Err(EngineError::ShiftNotFound { id: shift.id });
        }

        self.gateway.save_shift(&shift)?;
        self.emit(&EngineEvent::ShiftsChanged);
        self.run_achievement_evaluation()?;
        Ok(shift)
    }

    /// Deletes a shift.
    ///
    /// Deleting the active shift cancels tracking without recording any
    /// earnings. Achievements already unlocked stay unlocked even if the
    /// deletion drops an aggregate below its target.
    pub fn delete_shift(&self, shift_id: Uuid) -> EngineResult<()> {
        let mut slot = self.lock_active();
        if slot.as_ref().is_some_and(|s| s.id == shift_id) {
            *slot = None;
        }
        drop(slot);

        self.gateway.delete_shift(shift_id)?;
        self.emit(&EngineEvent::ShiftsChanged);
        self.run_achievement_evaluation()?;
        Ok(())
    }

    /// Prices a shift with the current configuration.
    ///
    /// Active shifts are priced up to the current instant for live display.
    pub fn earnings_for(&self, shift: &Shift) -> EngineResult<EarningsBreakdown> {
        let job = match shift.job_id {
            Some(id) => self.find_job(id)?,
            None => None,
        };
        let job_bonuses = match &job {
            Some(job) => self.gateway.fetch_bonuses(job.id)?,
            None => Vec::new(),
        };
        Ok(compute_earnings(
            shift,
            job.as_ref(),
            &job_bonuses,
            self.clock.now(),
            &self.config,
        ))
    }

    /// Rolls the full history up into display-ready aggregates.
    pub fn aggregates(&self) -> EngineResult<ShiftAggregates> {
        let shifts = self.gateway.fetch_shifts(&ShiftFilter::all())?;
        let jobs = self.gateway.fetch_jobs()?;
        let bonuses = self.gateway.fetch_all_bonuses()?;
        Ok(aggregate_history(&shifts, &jobs, &bonuses, &self.config))
    }

    /// Returns all achievement records in display order: unlocked first,
    /// then points descending, ties by catalog order.
    pub fn achievements(&self) -> EngineResult<Vec<Achievement>> {
        let mut records = self.gateway.fetch_achievements()?;
        self.achievement_engine.sort_for_display(&mut records);
        Ok(records)
    }

    /// Total points across unlocked achievements.
    pub fn total_points(&self) -> EngineResult<u32> {
        Ok(total_points(&self.gateway.fetch_achievements()?))
    }

    /// Re-runs achievement evaluation over the current history.
    ///
    /// Evaluation is idempotent, so this is safe to call at any time — in
    /// particular to catch records up after an achievement save failed
    /// mid-flow. Returns the catalog ids that unlocked.
    pub fn refresh_achievements(&self) -> EngineResult<Vec<String>> {
        self.run_achievement_evaluation()
    }

    /// Registers a change listener.
    ///
    /// Listeners are called synchronously after each persisted transition.
    pub fn subscribe(&self, listener: ChangeListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<Shift>> {
        // A poisoned lock means a listener or caller panicked mid-update;
        // the slot itself is always left in a valid state, so recover it.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_job(&self, job_id: Uuid) -> EngineResult<Option<Job>> {
        Ok(self
            .gateway
            .fetch_jobs()?
            .into_iter()
            .find(|j| j.id == job_id))
    }

    /// Looks up a job that can take new shifts.
    fn find_workable_job(&self, job_id: Uuid) -> EngineResult<Job> {
        let job = self
            .find_job(job_id)?
            .ok_or(EngineError::JobNotFound { id: job_id })?;
        if !job.is_active {
            return Err(EngineError::InvalidJob {
                field: "is_active".to_string(),
                message: "job has been deactivated".to_string(),
            });
        }
        Ok(job)
    }

    fn run_achievement_evaluation(&self) -> EngineResult<Vec<String>> {
        let shifts = self.gateway.fetch_shifts(&ShiftFilter::all())?;
        let jobs = self.gateway.fetch_jobs()?;
        let bonuses = self.gateway.fetch_all_bonuses()?;
        let records = self.gateway.fetch_achievements()?;

        let evaluation =
            self.achievement_engine
                .evaluate(&shifts, &jobs, &bonuses, &records, self.clock.now());

        for (before, after) in records.iter().zip(evaluation.achievements.iter()) {
            if before != after {
                self.gateway.save_achievement(after)?;
            }
        }

        if !evaluation.newly_unlocked.is_empty() {
            self.emit(&EngineEvent::AchievementsUnlocked {
                catalog_ids: evaluation.newly_unlocked.clone(),
            });
        }
        Ok(evaluation.newly_unlocked)
    }

    fn emit(&self, event: &EngineEvent) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }
}

fn validate_job_fields(name: &str, hourly_rate: Decimal) -> EngineResult<()> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidJob {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if hourly_rate <= Decimal::ZERO {
        return Err(EngineError::InvalidJob {
            field: "hourly_rate".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn validate_shift_fields(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    bonus_amount: Decimal,
) -> EngineResult<()> {
    if end_time <= start_time {
        return Err(EngineError::InvalidShift {
            field: "end_time".to_string(),
            message: "must be after start time".to_string(),
        });
    }
    if bonus_amount < Decimal::ZERO {
        return Err(EngineError::InvalidShift {
            field: "bonus_amount".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(())
}
