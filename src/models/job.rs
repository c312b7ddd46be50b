//! Job and bonus models.
//!
//! This module defines the Job and Bonus structs for representing
//! paid positions and their catalog-level extra payments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a named work position with an hourly pay rate.
///
/// A job owns zero or more [`Bonus`] records (cascade-deleted with the job)
/// and is referenced by the shifts worked under it. Shifts survive job
/// deletion under the default detach policy; see the tracker documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for the job.
    pub id: Uuid,
    /// The display name of the job. Non-empty after trimming.
    pub name: String,
    /// The hourly pay rate.
    pub hourly_rate: Decimal,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// Whether the job is available for new shifts.
    pub is_active: bool,
}

impl Job {
    /// Creates a new active job with a fresh id.
    ///
    /// Validation (non-empty name, positive rate) happens in the tracker
    /// before the job is persisted; this constructor only assembles the
    /// record.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use shift_engine::models::Job;
    ///
    /// let job = Job::new("Barista", Decimal::new(2000, 2), Utc::now());
    /// assert!(job.is_active);
    /// assert_eq!(job.hourly_rate, Decimal::new(2000, 2)); // 20.00
    /// ```
    pub fn new(name: impl Into<String>, hourly_rate: Decimal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hourly_rate,
            created_at,
            is_active: true,
        }
    }
}

/// A named extra payment amount associated with a job.
///
/// Bonuses are catalog entries shown alongside a job. They are not
/// automatically added to every shift's total; the ad-hoc per-shift bonus
/// lives on the shift itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    /// Unique identifier for the bonus.
    pub id: Uuid,
    /// The display name of the bonus (e.g., "Weekend loading").
    pub name: String,
    /// The bonus amount. Never negative.
    pub amount: Decimal,
    /// The job this bonus belongs to.
    pub job_id: Uuid,
}

impl Bonus {
    /// Creates a new bonus attached to the given job.
    pub fn new(name: impl Into<String>, amount: Decimal, job_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            job_id,
        }
    }
}
