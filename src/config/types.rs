//! Configuration types for the shift engine.
//!
//! This module contains the strongly-typed configuration structures that
//! can be deserialized from a YAML configuration file. Every field has a
//! default matching the engine's canonical behavior, so a partial file (or
//! no file at all) is valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DEFAULT_OVERTIME_ABOVE_HOURS, DEFAULT_REGULAR_MIN_HOURS};
use crate::error::{EngineError, EngineResult};
use crate::models::ShiftType;

/// Duration thresholds for deriving a shift's type at completion.
///
/// The canonical rule: a shift longer than `overtime_above_hours` is
/// Overtime; a shift of at least `regular_min_hours` is Regular; anything
/// shorter is Flexible. Both boundaries are inclusive on the Regular side,
/// so an exactly 8-hour shift is Regular and an exactly 6-hour shift is
/// Regular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTypeThresholds {
    /// Shifts strictly longer than this many hours classify as Overtime.
    #[serde(default = "default_overtime_above_hours")]
    pub overtime_above_hours: Decimal,
    /// Shifts of at least this many hours (and not Overtime) classify as
    /// Regular; shorter shifts are Flexible.
    #[serde(default = "default_regular_min_hours")]
    pub regular_min_hours: Decimal,
}

fn default_overtime_above_hours() -> Decimal {
    Decimal::from(DEFAULT_OVERTIME_ABOVE_HOURS)
}

fn default_regular_min_hours() -> Decimal {
    Decimal::from(DEFAULT_REGULAR_MIN_HOURS)
}

impl Default for ShiftTypeThresholds {
    fn default() -> Self {
        Self {
            overtime_above_hours: default_overtime_above_hours(),
            regular_min_hours: default_regular_min_hours(),
        }
    }
}

/// Pay-rate multipliers per shift type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMultipliers {
    /// Multiplier for Regular shifts.
    #[serde(default = "default_regular_multiplier")]
    pub regular: Decimal,
    /// Multiplier for Overtime shifts.
    #[serde(default = "default_overtime_multiplier")]
    pub overtime: Decimal,
    /// Multiplier for Special Event shifts.
    #[serde(default = "default_special_event_multiplier")]
    pub special_event: Decimal,
    /// Multiplier for Flexible shifts.
    #[serde(default = "default_regular_multiplier")]
    pub flexible: Decimal,
}

fn default_regular_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_overtime_multiplier() -> Decimal {
    Decimal::new(15, 1) // 1.5
}

fn default_special_event_multiplier() -> Decimal {
    Decimal::new(125, 2) // 1.25
}

impl Default for RateMultipliers {
    fn default() -> Self {
        Self {
            regular: default_regular_multiplier(),
            overtime: default_overtime_multiplier(),
            special_event: default_special_event_multiplier(),
            flexible: default_regular_multiplier(),
        }
    }
}

impl RateMultipliers {
    /// Returns the multiplier for the given shift type.
    ///
    /// An unclassified shift (still active) pays the Regular multiplier.
    pub fn for_type(&self, shift_type: Option<ShiftType>) -> Decimal {
        match shift_type {
            Some(ShiftType::Overtime) => self.overtime,
            Some(ShiftType::SpecialEvent) => self.special_event,
            Some(ShiftType::Flexible) => self.flexible,
            Some(ShiftType::Regular) | None => self.regular,
        }
    }
}

/// What happens to a job's shifts when the job is deleted.
///
/// Bonuses are always cascade-deleted with their job; this policy only
/// governs shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobDeletePolicy {
    /// Keep the shifts, clearing their job reference. Shift history is
    /// preserved; detached shifts contribute zero base earnings.
    #[default]
    DetachShifts,
    /// Delete the job's shifts along with the job.
    CascadeShifts,
}

/// Behavioral configuration for the engine.
///
/// The defaults encode the canonical rules; every knob exists because the
/// behavior was ambiguous or duplicated in earlier implementations and is
/// now an explicit choice.
///
/// # Example
///
/// ```
/// use shift_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert!(!config.include_job_bonuses);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Duration thresholds for shift-type derivation.
    #[serde(default)]
    pub thresholds: ShiftTypeThresholds,
    /// Pay-rate multipliers per shift type.
    #[serde(default)]
    pub multipliers: RateMultipliers,
    /// Whether a job's catalog bonuses are added to each of its shifts'
    /// totals. Off by default: catalog bonuses are informational, and only
    /// the shift's own ad-hoc bonus counts.
    #[serde(default)]
    pub include_job_bonuses: bool,
    /// What happens to a job's shifts when the job is deleted.
    #[serde(default)]
    pub job_delete_policy: JobDeletePolicy,
}

impl EngineConfig {
    /// Validates internal consistency of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if a multiplier or threshold
    /// is negative, or if the overtime boundary sits below the regular
    /// boundary (which would make the Regular band empty).
    pub fn validate(&self) -> EngineResult<()> {
        if self.thresholds.regular_min_hours < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "regular_min_hours must not be negative".to_string(),
            });
        }
        if self.thresholds.overtime_above_hours < self.thresholds.regular_min_hours {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "overtime_above_hours ({}) must be at least regular_min_hours ({})",
                    self.thresholds.overtime_above_hours, self.thresholds.regular_min_hours
                ),
            });
        }
        let multipliers = [
            self.multipliers.regular,
            self.multipliers.overtime,
            self.multipliers.special_event,
            self.multipliers.flexible,
        ];
        if multipliers.iter().any(|m| *m < Decimal::ZERO) {
            return Err(EngineError::InvalidConfig {
                message: "rate multipliers must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
