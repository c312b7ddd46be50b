//! The achievement catalog.
//!
//! The catalog is the fixed set of achievements the engine knows how to
//! evaluate: each entry pairs display metadata with a typed requirement
//! over the history aggregates. The built-in catalog ships 18 entries; a
//! custom catalog can be loaded from YAML.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::ShiftAggregates;
use crate::config::load_yaml;
use crate::error::{EngineError, EngineResult};
use crate::models::{AchievementCategory, AchievementRarity};

/// A typed predicate over the history aggregates.
///
/// Each variant names the aggregate it reads and carries the target value
/// at which the achievement unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Complete this many shifts.
    CompletedShifts(u64),
    /// Have this many jobs on record.
    JobsCreated(u64),
    /// Track this many hours in total.
    HoursTracked(Decimal),
    /// Earn this much in total (base + bonus).
    TotalEarnings(Decimal),
    /// Earn this much in ad-hoc shift bonuses.
    BonusEarnings(Decimal),
    /// Complete this many overtime shifts.
    OvertimeShifts(u64),
    /// Work shifts on this many consecutive days.
    ConsecutiveDays(u32),
    /// Work shifts in this many consecutive weeks.
    ConsecutiveWeeks(u32),
    /// Work shifts in this many consecutive months.
    ConsecutiveMonths(u32),
}

impl Requirement {
    /// The target value, used as the achievement's `max_progress`.
    pub fn target(&self) -> Decimal {
        match self {
            Requirement::CompletedShifts(n)
            | Requirement::JobsCreated(n)
            | Requirement::OvertimeShifts(n) => Decimal::from(*n),
            Requirement::HoursTracked(d)
            | Requirement::TotalEarnings(d)
            | Requirement::BonusEarnings(d) => *d,
            Requirement::ConsecutiveDays(n)
            | Requirement::ConsecutiveWeeks(n)
            | Requirement::ConsecutiveMonths(n) => Decimal::from(*n),
        }
    }

    /// Reads the aggregate this requirement scores against.
    pub fn measure(&self, aggregates: &ShiftAggregates) -> Decimal {
        match self {
            Requirement::CompletedShifts(_) => Decimal::from(aggregates.shift_count),
            Requirement::JobsCreated(_) => Decimal::from(aggregates.job_count),
            Requirement::HoursTracked(_) => aggregates.total_hours,
            Requirement::TotalEarnings(_) => aggregates.total_earnings,
            Requirement::BonusEarnings(_) => aggregates.bonus_total,
            Requirement::OvertimeShifts(_) => Decimal::from(aggregates.overtime_shift_count),
            Requirement::ConsecutiveDays(_) => Decimal::from(aggregates.longest_day_streak),
            Requirement::ConsecutiveWeeks(_) => Decimal::from(aggregates.longest_week_streak),
            Requirement::ConsecutiveMonths(_) => Decimal::from(aggregates.longest_month_streak),
        }
    }
}

/// One entry in the achievement catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable key, unique within the catalog (e.g., "first_shift").
    pub id: String,
    /// The display name.
    pub name: String,
    /// What the achievement is for.
    pub description: String,
    /// Icon identifier for the presentation layer.
    pub icon_name: String,
    /// Display grouping.
    pub category: AchievementCategory,
    /// How hard this achievement is to earn.
    pub rarity: AchievementRarity,
    /// Points awarded when unlocked.
    pub points: u32,
    /// The predicate that unlocks this achievement.
    pub requirement: Requirement,
}

/// The fixed set of achievements the engine evaluates.
///
/// Entry order is meaningful: it is the tie-break in the display sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementCatalog {
    entries: Vec<CatalogEntry>,
}

impl AchievementCatalog {
    /// Builds a catalog from explicit entries, validating uniqueness and
    /// target positivity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] on a duplicate or empty id,
    /// or a non-positive target.
    pub fn new(entries: Vec<CatalogEntry>) -> EngineResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(EngineError::InvalidConfig {
                    message: format!("catalog entry '{}' has an empty id", entry.name),
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(EngineError::InvalidConfig {
                    message: format!("duplicate catalog id '{}'", entry.id),
                });
            }
            if entry.requirement.target() <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    message: format!("catalog entry '{}' has a non-positive target", entry.id),
                });
            }
        }
        Ok(Self { entries })
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        use AchievementCategory::*;
        use AchievementRarity::*;

        fn entry(
            id: &str,
            name: &str,
            description: &str,
            icon_name: &str,
            category: AchievementCategory,
            rarity: AchievementRarity,
            points: u32,
            requirement: Requirement,
        ) -> CatalogEntry {
            CatalogEntry {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                icon_name: icon_name.to_string(),
                category,
                rarity,
                points,
                requirement,
            }
        }

        let entries = vec![
            // First Steps
            entry(
                "first_shift",
                "First Shift",
                "Complete your first shift",
                "play.circle.fill",
                FirstSteps,
                Common,
                10,
                Requirement::CompletedShifts(1),
            ),
            entry(
                "getting_started",
                "Getting Started",
                "Add your first job",
                "briefcase.fill",
                FirstSteps,
                Common,
                5,
                Requirement::JobsCreated(1),
            ),
            // Time Tracking
            entry(
                "time_tracker",
                "Time Tracker",
                "Track 10 hours total",
                "clock.fill",
                TimeTracking,
                Uncommon,
                15,
                Requirement::HoursTracked(Decimal::new(10, 0)),
            ),
            entry(
                "marathon_worker",
                "Marathon Worker",
                "Track 100 hours total",
                "clock.badge.checkmark",
                TimeTracking,
                Rare,
                50,
                Requirement::HoursTracked(Decimal::new(100, 0)),
            ),
            entry(
                "time_master",
                "Time Master",
                "Track 1000 hours total",
                "clock.badge.exclamationmark",
                TimeTracking,
                Epic,
                100,
                Requirement::HoursTracked(Decimal::new(1000, 0)),
            ),
            // Earnings
            entry(
                "first_dollar",
                "First Dollar",
                "Earn your first dollar",
                "dollarsign.circle.fill",
                Earnings,
                Common,
                10,
                Requirement::TotalEarnings(Decimal::ONE),
            ),
            entry(
                "hundredaire",
                "Hundredaire",
                "Earn $100 total",
                "dollarsign.square.fill",
                Earnings,
                Uncommon,
                25,
                Requirement::TotalEarnings(Decimal::new(100, 0)),
            ),
            entry(
                "thousandaire",
                "Thousandaire",
                "Earn $1,000 total",
                "dollarsign.circle",
                Earnings,
                Rare,
                75,
                Requirement::TotalEarnings(Decimal::new(1000, 0)),
            ),
            entry(
                "money_maker",
                "Money Maker",
                "Earn $10,000 total",
                "banknote.fill",
                Earnings,
                Epic,
                150,
                Requirement::TotalEarnings(Decimal::new(10000, 0)),
            ),
            // Consistency
            entry(
                "daily_grind",
                "Daily Grind",
                "Work 7 days in a row",
                "calendar.badge.clock",
                Consistency,
                Uncommon,
                30,
                Requirement::ConsecutiveDays(7),
            ),
            entry(
                "week_warrior",
                "Week Warrior",
                "Work 4 weeks in a row",
                "calendar.badge.checkmark",
                Consistency,
                Rare,
                75,
                Requirement::ConsecutiveWeeks(4),
            ),
            entry(
                "monthly_master",
                "Monthly Master",
                "Work 3 months in a row",
                "calendar.badge.exclamationmark",
                Consistency,
                Epic,
                150,
                Requirement::ConsecutiveMonths(3),
            ),
            // Special
            entry(
                "overtime_hero",
                "Overtime Hero",
                "Work 10 overtime shifts",
                "clock.badge.plus",
                Special,
                Rare,
                40,
                Requirement::OvertimeShifts(10),
            ),
            entry(
                "bonus_hunter",
                "Bonus Hunter",
                "Earn $500 in bonuses",
                "gift.fill",
                Special,
                Rare,
                60,
                Requirement::BonusEarnings(Decimal::new(500, 0)),
            ),
            entry(
                "multi_tasker",
                "Multi-Tasker",
                "Work 5 different jobs",
                "person.3.fill",
                Special,
                Uncommon,
                50,
                Requirement::JobsCreated(5),
            ),
            // Milestones
            entry(
                "century_club",
                "Century Club",
                "Complete 100 shifts",
                "100.circle.fill",
                Milestones,
                Epic,
                100,
                Requirement::CompletedShifts(100),
            ),
            entry(
                "half_thousand",
                "Half Thousand",
                "Complete 500 shifts",
                "500.circle.fill",
                Milestones,
                Legendary,
                250,
                Requirement::CompletedShifts(500),
            ),
            entry(
                "thousand_club",
                "Thousand Club",
                "Complete 1000 shifts",
                "1000.circle.fill",
                Milestones,
                Legendary,
                500,
                Requirement::CompletedShifts(1000),
            ),
        ];

        // The built-in entries satisfy every validation rule.
        Self { entries }
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, fails to parse, or fails
    /// catalog validation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shift_engine::achievements::AchievementCatalog;
    ///
    /// let catalog = AchievementCatalog::load("./config/achievements.yaml")?;
    /// # Ok::<(), shift_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let entries: Vec<CatalogEntry> = load_yaml(path.as_ref())?;
        Self::new(entries)
    }

    /// The entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Looks up an entry by its stable id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The position of an entry in the catalog, the display-sort tie-break.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}
