//! Achievement model and related types.
//!
//! Achievements are gamification records seeded once from a fixed catalog
//! and updated by the achievement engine after every shift-affecting event.
//! They are keyed by a stable catalog id and never deleted by normal flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category an achievement belongs to, used for display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Onboarding achievements (first shift, first job).
    FirstSteps,
    /// Cumulative tracked hours.
    TimeTracking,
    /// Cumulative earnings.
    Earnings,
    /// Streaks of consecutive days, weeks, or months.
    Consistency,
    /// Everything that doesn't fit the other buckets.
    Special,
    /// Lifetime shift-count milestones.
    Milestones,
}

impl std::fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AchievementCategory::FirstSteps => "First Steps",
            AchievementCategory::TimeTracking => "Time Tracking",
            AchievementCategory::Earnings => "Earnings",
            AchievementCategory::Consistency => "Consistency",
            AchievementCategory::Special => "Special",
            AchievementCategory::Milestones => "Milestones",
        };
        write!(f, "{}", label)
    }
}

/// How hard an achievement is to earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementRarity {
    /// Earned by nearly everyone.
    Common,
    /// Takes a little dedication.
    Uncommon,
    /// Takes sustained use.
    Rare,
    /// Takes serious commitment.
    Epic,
    /// The long haul.
    Legendary,
}

impl AchievementRarity {
    /// The score weight for this rarity, used for weighted statistics.
    pub fn score_weight(&self) -> u32 {
        match self {
            AchievementRarity::Common => 1,
            AchievementRarity::Uncommon => 2,
            AchievementRarity::Rare => 3,
            AchievementRarity::Epic => 4,
            AchievementRarity::Legendary => 5,
        }
    }
}

impl std::fmt::Display for AchievementRarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AchievementRarity::Common => "Common",
            AchievementRarity::Uncommon => "Uncommon",
            AchievementRarity::Rare => "Rare",
            AchievementRarity::Epic => "Epic",
            AchievementRarity::Legendary => "Legendary",
        };
        write!(f, "{}", label)
    }
}

/// A gamification record tracking progress toward a milestone.
///
/// Invariant: `is_unlocked` implies `progress >= max_progress`. Unlocking is
/// monotonic — once unlocked, an achievement never re-locks even if later
/// history (say, a deleted shift) would reduce the underlying aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// Stable key into the achievement catalog (e.g., "first_shift").
    pub catalog_id: String,
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
    /// Current progress toward the target. Never negative, capped at
    /// `max_progress`.
    pub progress: Decimal,
    /// The target value. Always positive.
    pub max_progress: Decimal,
    /// Whether the achievement has been earned.
    pub is_unlocked: bool,
    /// When the achievement was earned. Set once, on the unlocking
    /// transition.
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Returns progress as a fraction in `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// # use chrono::Utc;
    /// # use uuid::Uuid;
    /// use shift_engine::models::{Achievement, AchievementCategory, AchievementRarity};
    ///
    /// # let mut achievement = Achievement {
    /// #     id: Uuid::new_v4(),
    /// #     catalog_id: "time_tracker".to_string(),
    /// #     name: "Time Tracker".to_string(),
    /// #     description: "Track 10 hours total".to_string(),
    /// #     icon_name: "clock.fill".to_string(),
    /// #     category: AchievementCategory::TimeTracking,
    /// #     rarity: AchievementRarity::Uncommon,
    /// #     points: 15,
    /// #     progress: Decimal::new(5, 0),
    /// #     max_progress: Decimal::new(10, 0),
    /// #     is_unlocked: false,
    /// #     unlocked_at: None,
    /// # };
    /// assert_eq!(achievement.progress_fraction(), Decimal::new(5, 1)); // 0.5
    /// ```
    pub fn progress_fraction(&self) -> Decimal {
        if self.max_progress <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.progress / self.max_progress).min(Decimal::ONE)
    }

    /// Returns true if progress has reached the target.
    pub fn is_completed(&self) -> bool {
        self.progress >= self.max_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(progress: i64, max: i64) -> Achievement {
        Achievement {
            id: Uuid::new_v4(),
            catalog_id: "marathon_worker".to_string(),
            name: "Marathon Worker".to_string(),
            description: "Track 100 hours total".to_string(),
            icon_name: "clock.badge.checkmark".to_string(),
            category: AchievementCategory::TimeTracking,
            rarity: AchievementRarity::Rare,
            points: 50,
            progress: Decimal::new(progress, 0),
            max_progress: Decimal::new(max, 0),
            is_unlocked: false,
            unlocked_at: None,
        }
    }

    #[test]
    fn test_progress_fraction_clamps_to_one() {
        let achievement = sample(150, 100);
        assert_eq!(achievement.progress_fraction(), Decimal::ONE);
    }

    #[test]
    fn test_progress_fraction_partial() {
        let achievement = sample(25, 100);
        assert_eq!(achievement.progress_fraction(), Decimal::new(25, 2));
    }

    #[test]
    fn test_progress_fraction_zero_target_is_zero() {
        let achievement = sample(5, 0);
        assert_eq!(achievement.progress_fraction(), Decimal::ZERO);
    }

    #[test]
    fn test_is_completed_at_exact_target() {
        assert!(sample(100, 100).is_completed());
        assert!(!sample(99, 100).is_completed());
    }

    #[test]
    fn test_rarity_score_weights_are_ascending() {
        let weights: Vec<u32> = [
            AchievementRarity::Common,
            AchievementRarity::Uncommon,
            AchievementRarity::Rare,
            AchievementRarity::Epic,
            AchievementRarity::Legendary,
        ]
        .iter()
        .map(|r| r.score_weight())
        .collect();

        assert_eq!(weights, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(AchievementCategory::FirstSteps.to_string(), "First Steps");
        assert_eq!(AchievementCategory::TimeTracking.to_string(), "Time Tracking");
        assert_eq!(AchievementCategory::Milestones.to_string(), "Milestones");
    }

    #[test]
    fn test_achievement_serialization_round_trip() {
        let achievement = sample(42, 100);

        let json = serde_json::to_string(&achievement).unwrap();
        let deserialized: Achievement = serde_json::from_str(&json).unwrap();
        assert_eq!(achievement, deserialized);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&AchievementCategory::FirstSteps).unwrap(),
            "\"first_steps\""
        );
        assert_eq!(
            serde_json::to_string(&AchievementRarity::Legendary).unwrap(),
            "\"legendary\""
        );
    }
}
