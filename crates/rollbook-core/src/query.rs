//! # Query Module
//!
//! Read-side operations over a `Registry`.
//!
//! - `list_all`: insertion order
//! - `list_sorted`: percentage descending, ties by ascending roll
//! - `get_count`, `get_one`: direct delegations
//!
//! The sort is total over `(percentage, roll)`, so repeated calls against
//! unchanged data return identical sequences.

use crate::{RecordError, Registry, Roll, StudentRecord};
use std::cmp::{Ordering, Reverse};

/// Ordering used by the sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order.
    #[default]
    Inserted,
    /// Percentage descending, then roll ascending.
    Standing,
}

/// All records in insertion order.
pub fn list_all(registry: &Registry) -> Result<Vec<StudentRecord>, RecordError> {
    registry.list()
}

/// All records ranked by percentage (highest first); ties by ascending roll.
pub fn list_sorted(registry: &Registry) -> Result<Vec<StudentRecord>, RecordError> {
    let mut records = registry.list()?;
    sort_by_standing(&mut records);
    Ok(records)
}

/// List with an explicit ordering.
pub fn list(registry: &Registry, order: SortOrder) -> Result<Vec<StudentRecord>, RecordError> {
    match order {
        SortOrder::Inserted => list_all(registry),
        SortOrder::Standing => list_sorted(registry),
    }
}

/// Number of stored records.
pub fn get_count(registry: &Registry) -> Result<usize, RecordError> {
    registry.count()
}

/// One record by roll.
pub fn get_one(registry: &Registry, roll: Roll) -> Result<StudentRecord, RecordError> {
    registry.get(roll)
}

/// Compare two records by standing.
#[must_use]
pub fn by_standing(a: &StudentRecord, b: &StudentRecord) -> Ordering {
    (Reverse(a.percentage()), a.roll()).cmp(&(Reverse(b.percentage()), b.roll()))
}

/// Sort records in place by standing.
pub fn sort_by_standing(records: &mut [StudentRecord]) {
    records.sort_by(by_standing);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StudentDraft;

    fn registry_with(entries: &[(u64, i64)]) -> Registry {
        let mut registry = Registry::new();
        for &(roll, mark) in entries {
            registry
                .create(StudentDraft::new(Roll(roll)).with_marks([mark; 5]))
                .expect("create");
        }
        registry
    }

    fn rolls(records: &[StudentRecord]) -> Vec<u64> {
        records.iter().map(|r| r.roll().value()).collect()
    }

    #[test]
    fn sorted_breaks_ties_by_roll() {
        let registry = registry_with(&[(1, 40), (2, 90), (3, 90), (4, 60)]);
        let sorted = list_sorted(&registry).expect("sorted");
        assert_eq!(rolls(&sorted), vec![2, 3, 4, 1]);
    }

    #[test]
    fn tie_order_ignores_insertion_order() {
        let registry = registry_with(&[(3, 90), (2, 90)]);
        let sorted = list_sorted(&registry).expect("sorted");
        assert_eq!(rolls(&sorted), vec![2, 3]);
    }

    #[test]
    fn list_all_is_insertion_order() {
        let registry = registry_with(&[(9, 10), (1, 99), (5, 50)]);
        assert_eq!(rolls(&list_all(&registry).expect("list")), vec![9, 1, 5]);
        assert_eq!(
            rolls(&list(&registry, SortOrder::Standing).expect("list")),
            vec![1, 5, 9]
        );
    }

    #[test]
    fn count_and_get_one_delegate() {
        let registry = registry_with(&[(1, 10), (2, 20)]);
        assert_eq!(get_count(&registry).expect("count"), 2);
        assert_eq!(get_one(&registry, Roll(2)).expect("get").roll(), Roll(2));
        assert!(matches!(
            get_one(&registry, Roll(3)),
            Err(RecordError::NotFound(Roll(3)))
        ));
    }

    #[test]
    fn empty_registry_sorts_to_empty() {
        let registry = Registry::new();
        assert!(list_sorted(&registry).expect("sorted").is_empty());
    }
}
