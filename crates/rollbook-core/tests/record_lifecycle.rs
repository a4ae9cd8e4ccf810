//! # Record Lifecycle Tests
//!
//! End-to-end behaviour of the registry across both backends: create,
//! read, update, delete, ranking and seeding.

use rollbook_core::{
    Grade, MemoryStore, RecordError, Registry, Roll, SAMPLE_STUDENTS, StudentDraft, StudentPatch,
    StudentRecord, StudentStore, list_all, list_sorted, seed,
};
use tempfile::tempdir;

// =============================================================================
// HELPERS
// =============================================================================

/// A store that refuses to insert one particular roll.
#[derive(Debug, Default)]
struct FailingStore {
    inner: MemoryStore,
    fail_on: u64,
}

impl StudentStore for FailingStore {
    fn insert(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        if record.roll() == Roll(self.fail_on) {
            return Err(RecordError::Storage("disk full".to_string()));
        }
        self.inner.insert(record)
    }

    fn get(&self, roll: Roll) -> Result<Option<StudentRecord>, RecordError> {
        self.inner.get(roll)
    }

    fn replace(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        self.inner.replace(record)
    }

    fn remove(&mut self, roll: Roll) -> Result<(), RecordError> {
        self.inner.remove(roll)
    }

    fn records(&self) -> Result<Vec<StudentRecord>, RecordError> {
        self.inner.records()
    }

    fn count(&self) -> Result<usize, RecordError> {
        self.inner.count()
    }
}

fn full_lifecycle(registry: &mut Registry) {
    let created = registry
        .create(
            StudentDraft::new(Roll(101))
                .with_name("Rajesh Kumar")
                .with_age(20)
                .with_branch("Computer Science")
                .with_marks([95, 92, 88, 90, 94]),
        )
        .expect("create");
    assert_eq!(created.percentage().to_string(), "91.80");
    assert_eq!(created.grade(), Grade::A);
    assert_eq!(registry.get(Roll(101)).expect("get"), created);

    let patch = StudentPatch {
        branch: Some("Electronics".to_string()),
        marks: [Some(50), None, None, None, Some(40)],
        ..StudentPatch::default()
    };
    let updated = registry.update(Roll(101), &patch).expect("update");
    assert_eq!(updated.name(), "Rajesh Kumar");
    assert_eq!(updated.age(), 20);
    assert_eq!(updated.branch(), "Electronics");
    assert_eq!(updated.marks().values(), [50, 92, 88, 90, 40]);
    assert_eq!(updated.percentage().to_string(), "72.00");
    assert_eq!(updated.grade(), Grade::C);

    registry.delete(Roll(101)).expect("delete");
    assert!(matches!(
        registry.get(Roll(101)),
        Err(RecordError::NotFound(Roll(101)))
    ));
    assert_eq!(registry.count().expect("count"), 0);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn lifecycle_in_memory() {
    full_lifecycle(&mut Registry::new());
}

#[test]
fn lifecycle_on_redb() {
    let temp = tempdir().expect("temp dir");
    let mut registry = Registry::with_redb(temp.path().join("lifecycle.redb")).expect("open");
    full_lifecycle(&mut registry);
}

#[test]
fn text_fields_are_truncated_by_characters() {
    let mut registry = Registry::new();
    let long_name = "é".repeat(80);
    let record = registry
        .create(
            StudentDraft::new(Roll(1))
                .with_name(long_name)
                .with_branch("b".repeat(45)),
        )
        .expect("create");

    assert_eq!(record.name().chars().count(), 50);
    assert_eq!(record.branch().chars().count(), 30);
}

#[test]
fn clamped_marks_drive_derivation() {
    let mut registry = Registry::new();
    let record = registry
        .create(StudentDraft::new(Roll(1)).with_marks([150, -5, 100, 100, 100]))
        .expect("create");

    assert_eq!(record.marks().values(), [100, 0, 100, 100, 100]);
    assert_eq!(record.percentage().to_string(), "80.00");
    assert_eq!(record.grade(), Grade::B);
}

#[test]
fn empty_patch_changes_nothing() {
    let mut registry = Registry::new();
    let created = registry
        .create(StudentDraft::new(Roll(3)).with_name("Amit").with_marks([75; 5]))
        .expect("create");

    let patch = StudentPatch::default();
    assert!(patch.is_empty());
    assert_eq!(registry.update(Roll(3), &patch).expect("update"), created);
}

#[test]
fn readding_a_deleted_roll_moves_it_to_the_end() {
    let mut registry = Registry::new();
    for roll in [1, 2, 3] {
        registry.create(StudentDraft::new(Roll(roll))).expect("create");
    }
    registry.delete(Roll(1)).expect("delete");
    registry.create(StudentDraft::new(Roll(1))).expect("recreate");

    let rolls: Vec<u64> = list_all(&registry)
        .expect("list")
        .iter()
        .map(|r| r.roll().value())
        .collect();
    assert_eq!(rolls, vec![2, 3, 1]);
}

// =============================================================================
// SEEDING
// =============================================================================

#[test]
fn seeded_ranking_matches_sample_marks() {
    let mut registry = Registry::new();
    seed(&mut registry).expect("seed");

    let ranked: Vec<u64> = list_sorted(&registry)
        .expect("sorted")
        .iter()
        .map(|r| r.roll().value())
        .collect();
    assert_eq!(ranked, vec![106, 109, 101, 107, 102, 110, 108, 103, 104, 105]);
}

#[test]
fn seed_survives_reopen_and_skips_on_second_run() {
    let temp = tempdir().expect("temp dir");
    let path = temp.path().join("seed.redb");

    {
        let mut registry = Registry::with_redb(&path).expect("open");
        let report = seed(&mut registry).expect("seed");
        assert_eq!(report.added, SAMPLE_STUDENTS.len());
    }

    let mut registry = Registry::with_redb(&path).expect("reopen");
    let report = seed(&mut registry).expect("reseed");
    assert_eq!(report.added, 0);
    assert_eq!(report.skipped.len(), SAMPLE_STUDENTS.len());
}

#[test]
fn seed_aborts_on_storage_failure_and_keeps_earlier_inserts() {
    let store = FailingStore {
        fail_on: 104,
        ..FailingStore::default()
    };
    let mut registry = Registry::with_store(Box::new(store));

    let result = seed(&mut registry);
    assert!(matches!(result, Err(RecordError::Storage(_))));
    assert_eq!(registry.count().expect("count"), 3);
    assert!(registry.get(Roll(103)).is_ok());
    assert!(matches!(
        registry.get(Roll(105)),
        Err(RecordError::NotFound(Roll(105)))
    ));
}
