//! # Record Store
//!
//! The storage seam for student records.
//!
//! This module defines the `StudentStore` trait and its in-memory
//! implementation. All data structures use `BTreeMap` for deterministic
//! ordering.
//!
//! Stores are dumb containers: they enforce key uniqueness and existence,
//! and keep insertion order. Validation and derivation happen before a
//! record reaches a store (see `Registry`).

use crate::{RecordError, Roll, StudentRecord};
use std::collections::BTreeMap;
use std::fmt::Debug;

// =============================================================================
// STUDENTSTORE TRAIT
// =============================================================================

/// The StudentStore trait defines raw record storage.
///
/// All fallible operations return `Result<T, RecordError>` so in-memory and
/// persistent backends can be used interchangeably.
pub trait StudentStore: Debug {
    /// Insert a new record.
    ///
    /// Fails with `RecordError::DuplicateKey` if the roll is already present.
    fn insert(&mut self, record: StudentRecord) -> Result<(), RecordError>;

    /// Fetch a record by roll.
    fn get(&self, roll: Roll) -> Result<Option<StudentRecord>, RecordError>;

    /// Overwrite an existing record, keeping its insertion position.
    ///
    /// Fails with `RecordError::NotFound` if the roll is absent.
    fn replace(&mut self, record: StudentRecord) -> Result<(), RecordError>;

    /// Permanently remove a record.
    ///
    /// Fails with `RecordError::NotFound` if the roll is absent.
    fn remove(&mut self, roll: Roll) -> Result<(), RecordError>;

    /// All records in insertion order.
    fn records(&self) -> Result<Vec<StudentRecord>, RecordError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, RecordError>;

    /// Check whether a roll is present.
    fn contains(&self, roll: Roll) -> Result<bool, RecordError> {
        Ok(self.get(roll)?.is_some())
    }
}

// =============================================================================
// MEMORY STORE IMPLEMENTATION
// =============================================================================

/// Volatile in-memory store.
///
/// Records are keyed by an insertion sequence number so that iteration
/// order is insertion order; a second index maps roll to sequence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Insertion sequence -> record
    records: BTreeMap<u64, StudentRecord>,

    /// Reverse lookup: Roll -> insertion sequence
    roll_index: BTreeMap<Roll, u64>,

    /// Next insertion sequence number
    next_seq: u64,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudentStore for MemoryStore {
    fn insert(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        let roll = record.roll();
        if self.roll_index.contains_key(&roll) {
            return Err(RecordError::DuplicateKey(roll));
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.records.insert(seq, record);
        self.roll_index.insert(roll, seq);
        Ok(())
    }

    fn get(&self, roll: Roll) -> Result<Option<StudentRecord>, RecordError> {
        Ok(self
            .roll_index
            .get(&roll)
            .and_then(|seq| self.records.get(seq))
            .cloned())
    }

    fn replace(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        let roll = record.roll();
        let seq = *self
            .roll_index
            .get(&roll)
            .ok_or(RecordError::NotFound(roll))?;
        self.records.insert(seq, record);
        Ok(())
    }

    fn remove(&mut self, roll: Roll) -> Result<(), RecordError> {
        let seq = self
            .roll_index
            .remove(&roll)
            .ok_or(RecordError::NotFound(roll))?;
        self.records.remove(&seq);
        Ok(())
    }

    fn records(&self) -> Result<Vec<StudentRecord>, RecordError> {
        Ok(self.records.values().cloned().collect())
    }

    fn count(&self) -> Result<usize, RecordError> {
        Ok(self.records.len())
    }

    fn contains(&self, roll: Roll) -> Result<bool, RecordError> {
        Ok(self.roll_index.contains_key(&roll))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StudentDraft;

    fn record(roll: u64) -> StudentRecord {
        StudentRecord::from_draft(StudentDraft::new(Roll(roll)).with_marks([50; 5]))
    }

    #[test]
    fn insert_and_get() {
        let mut store = MemoryStore::new();
        store.insert(record(1)).expect("insert");

        let fetched = store.get(Roll(1)).expect("get");
        assert_eq!(fetched.map(|r| r.roll()), Some(Roll(1)));
        assert!(store.get(Roll(2)).expect("get").is_none());
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut store = MemoryStore::new();
        store.insert(record(1)).expect("insert");

        let result = store.insert(record(1));
        assert!(matches!(result, Err(RecordError::DuplicateKey(Roll(1)))));
        assert_eq!(store.count().expect("count"), 1);
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut store = MemoryStore::new();
        for roll in [30, 10, 20] {
            store.insert(record(roll)).expect("insert");
        }

        let rolls: Vec<u64> = store
            .records()
            .expect("records")
            .iter()
            .map(|r| r.roll().value())
            .collect();
        assert_eq!(rolls, vec![30, 10, 20]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = MemoryStore::new();
        for roll in [1, 2, 3] {
            store.insert(record(roll)).expect("insert");
        }

        let updated = StudentRecord::from_draft(StudentDraft::new(Roll(2)).with_name("Changed"));
        store.replace(updated).expect("replace");

        let records = store.records().expect("records");
        assert_eq!(records[1].roll(), Roll(2));
        assert_eq!(records[1].name(), "Changed");
    }

    #[test]
    fn replace_and_remove_missing_fail() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.replace(record(9)),
            Err(RecordError::NotFound(Roll(9)))
        ));
        assert!(matches!(
            store.remove(Roll(9)),
            Err(RecordError::NotFound(Roll(9)))
        ));
    }

    #[test]
    fn removed_roll_can_be_reinserted_at_end() {
        let mut store = MemoryStore::new();
        for roll in [1, 2] {
            store.insert(record(roll)).expect("insert");
        }
        store.remove(Roll(1)).expect("remove");
        assert!(!store.contains(Roll(1)).expect("contains"));

        store.insert(record(1)).expect("reinsert");
        let rolls: Vec<Roll> = store
            .records()
            .expect("records")
            .iter()
            .map(StudentRecord::roll)
            .collect();
        assert_eq!(rolls, vec![Roll(2), Roll(1)]);
    }
}
