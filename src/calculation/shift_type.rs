//! Shift-type derivation from duration.
//!
//! When a tracked shift ends (or a manual shift is entered without an
//! explicit type), its classification is derived from the final duration.
//! One canonical rule applies everywhere; the thresholds are configuration,
//! not scattered constants.

use rust_decimal::Decimal;

use crate::config::ShiftTypeThresholds;
use crate::models::ShiftType;

/// The default boundary above which a shift is Overtime, in hours.
pub const DEFAULT_OVERTIME_ABOVE_HOURS: u32 = 8;

/// The default minimum duration of a Regular shift, in hours.
pub const DEFAULT_REGULAR_MIN_HOURS: u32 = 6;

/// Derives a shift's type from its duration.
///
/// The canonical rule:
///
/// - duration > `overtime_above_hours` (default 8) ⇒ [`ShiftType::Overtime`]
/// - `regular_min_hours` (default 6) ≤ duration ≤ the overtime boundary ⇒
///   [`ShiftType::Regular`]
/// - otherwise ⇒ [`ShiftType::Flexible`]
///
/// Both boundaries land on Regular: an exactly 8-hour shift is Regular (the
/// overtime rule is strictly greater-than) and an exactly 6-hour shift is
/// Regular. [`ShiftType::SpecialEvent`] is never derived; it can only be
/// assigned manually.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shift_engine::calculation::classify_shift_type;
/// use shift_engine::config::ShiftTypeThresholds;
/// use shift_engine::models::ShiftType;
///
/// let thresholds = ShiftTypeThresholds::default();
/// assert_eq!(
///     classify_shift_type(Decimal::new(9, 0), &thresholds),
///     ShiftType::Overtime
/// );
/// assert_eq!(
///     classify_shift_type(Decimal::new(8, 0), &thresholds),
///     ShiftType::Regular
/// );
/// assert_eq!(
///     classify_shift_type(Decimal::new(4, 0), &thresholds),
///     ShiftType::Flexible
/// );
/// ```
pub fn classify_shift_type(
    duration_hours: Decimal,
    thresholds: &ShiftTypeThresholds,
) -> ShiftType {
    if duration_hours > thresholds.overtime_above_hours {
        ShiftType::Overtime
    } else if duration_hours >= thresholds.regular_min_hours {
        ShiftType::Regular
    } else {
        ShiftType::Flexible
    }
}
