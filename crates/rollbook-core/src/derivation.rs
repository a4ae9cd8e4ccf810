//! # Derivation Engine
//!
//! The single place where `percentage` and `grade` are computed.
//!
//! Every write path (`StudentRecord::from_draft`, `StudentRecord::apply`)
//! calls [`derive`]; nothing else may produce a percentage or grade for a
//! stored record.
//!
//! ## Grade Bands (inclusive lower bounds)
//!
//! | Grade | Percentage |
//! |-------|------------|
//! | A     | >= 90.00   |
//! | B     | >= 75.00   |
//! | C     | >= 60.00   |
//! | D     | >= 40.00   |
//! | F     | <  40.00   |

use crate::primitives::{
    GRADE_A_MIN, GRADE_B_MIN, GRADE_C_MIN, GRADE_D_MIN, HUNDREDTHS_PER_PERCENT, MARK_COUNT,
};
use crate::{Grade, Marks, Percentage};

/// Compute the derived pair for a set of marks.
#[must_use]
pub fn derive(marks: &Marks) -> (Percentage, Grade) {
    let percentage = percentage_of(marks);
    (percentage, grade_for(percentage))
}

/// `sum(marks) / 5`, exact in hundredths.
#[must_use]
pub fn percentage_of(marks: &Marks) -> Percentage {
    Percentage::from_hundredths(marks.sum() * HUNDREDTHS_PER_PERCENT / MARK_COUNT as u32)
}

/// Map a percentage to its grade band. Total over all inputs.
#[must_use]
pub fn grade_for(percentage: Percentage) -> Grade {
    match percentage.hundredths() {
        p if p >= GRADE_A_MIN => Grade::A,
        p if p >= GRADE_B_MIN => Grade::B,
        p if p >= GRADE_C_MIN => Grade::C,
        p if p >= GRADE_D_MIN => Grade::D,
        _ => Grade::F,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(hundredths: u32) -> Percentage {
        Percentage::from_hundredths(hundredths)
    }

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        assert_eq!(grade_for(pct(10_000)), Grade::A);
        assert_eq!(grade_for(pct(9000)), Grade::A);
        assert_eq!(grade_for(pct(8999)), Grade::B);
        assert_eq!(grade_for(pct(7500)), Grade::B);
        assert_eq!(grade_for(pct(7499)), Grade::C);
        assert_eq!(grade_for(pct(6000)), Grade::C);
        assert_eq!(grade_for(pct(5999)), Grade::D);
        assert_eq!(grade_for(pct(4000)), Grade::D);
        assert_eq!(grade_for(pct(3999)), Grade::F);
        assert_eq!(grade_for(pct(0)), Grade::F);
    }

    #[test]
    fn percentage_is_mean_of_marks() {
        let marks = Marks::from_raw([95, 92, 88, 90, 94]);
        assert_eq!(percentage_of(&marks).hundredths(), 9180);

        let marks = Marks::from_raw([1, 0, 0, 0, 0]);
        assert_eq!(percentage_of(&marks).hundredths(), 20);
    }

    #[test]
    fn derive_pairs_percentage_and_grade() {
        let (p, g) = derive(&Marks::from_raw([90; 5]));
        assert_eq!(p.to_string(), "90.00");
        assert_eq!(g, Grade::A);

        let (p, g) = derive(&Marks::from_raw([0; 5]));
        assert_eq!(p.to_string(), "0.00");
        assert_eq!(g, Grade::F);
    }

    #[test]
    fn clamped_marks_stay_within_hundred_percent() {
        let (p, g) = derive(&Marks::from_raw([250, 100, 100, 100, 100]));
        assert_eq!(p.hundredths(), 10_000);
        assert_eq!(g, Grade::A);
    }
}
