//! # Record Primitives
//!
//! Fixed limits and constants for student records.
//!
//! These are compiled into the binary and immutable at runtime.

/// Number of mark fields on every record (`mark1` .. `mark5`).
pub const MARK_COUNT: usize = 5;

/// Lowest mark a record can store. Lower inputs are clamped up to this.
pub const MIN_MARK: u8 = 0;

/// Highest mark a record can store. Higher inputs are clamped down to this.
pub const MAX_MARK: u8 = 100;

/// Maximum stored length of a student name, in characters.
///
/// Longer names are truncated, not rejected.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum stored length of a branch, in characters.
///
/// Longer branches are truncated, not rejected.
pub const MAX_BRANCH_LENGTH: usize = 30;

/// Percentages are held as integer hundredths of a percent.
///
/// `9000` means `90.00%`.
pub const HUNDREDTHS_PER_PERCENT: u32 = 100;

// =============================================================================
// GRADE THRESHOLDS (inclusive lower bounds, in hundredths)
// =============================================================================

/// Lowest percentage graded `A` (90.00).
pub const GRADE_A_MIN: u32 = 90 * HUNDREDTHS_PER_PERCENT;

/// Lowest percentage graded `B` (75.00).
pub const GRADE_B_MIN: u32 = 75 * HUNDREDTHS_PER_PERCENT;

/// Lowest percentage graded `C` (60.00).
pub const GRADE_C_MIN: u32 = 60 * HUNDREDTHS_PER_PERCENT;

/// Lowest percentage graded `D` (40.00). Anything below is `F`.
pub const GRADE_D_MIN: u32 = 40 * HUNDREDTHS_PER_PERCENT;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_strictly_descending() {
        assert!(GRADE_A_MIN > GRADE_B_MIN);
        assert!(GRADE_B_MIN > GRADE_C_MIN);
        assert!(GRADE_C_MIN > GRADE_D_MIN);
        assert!(GRADE_D_MIN > 0);
    }

    #[test]
    fn mark_bounds_cover_percentage_range() {
        // Five maximum marks must average to exactly 100.00.
        let max_sum = MAX_MARK as u32 * MARK_COUNT as u32;
        assert_eq!(max_sum * HUNDREDTHS_PER_PERCENT / MARK_COUNT as u32, 10_000);
    }
}
