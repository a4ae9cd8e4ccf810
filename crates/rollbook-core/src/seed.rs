//! # Seed Loader
//!
//! Inserts a fixed batch of sample students through `Registry::create`, so
//! every sample goes through the same validation and derivation as a real
//! write.
//!
//! The batch is not atomic. A sample whose roll already exists is skipped
//! and reported; any other failure stops the batch and is returned, with the
//! samples inserted before it left in place.

use crate::{RecordError, Registry, Roll, StudentDraft};

/// A built-in sample student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleStudent {
    pub roll: u64,
    pub name: &'static str,
    pub age: u32,
    pub branch: &'static str,
    pub marks: [i64; 5],
}

impl SampleStudent {
    /// Convert to a creatable draft.
    #[must_use]
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft::new(Roll(self.roll))
            .with_name(self.name)
            .with_age(self.age)
            .with_branch(self.branch)
            .with_marks(self.marks)
    }
}

/// The sample batch.
pub const SAMPLE_STUDENTS: [SampleStudent; 10] = [
    SampleStudent { roll: 101, name: "Rajesh Kumar", age: 20, branch: "Computer Science", marks: [95, 92, 88, 90, 94] },
    SampleStudent { roll: 102, name: "Priya Sharma", age: 21, branch: "Electronics", marks: [85, 87, 82, 86, 84] },
    SampleStudent { roll: 103, name: "Amit Singh", age: 19, branch: "Mechanical", marks: [75, 78, 72, 76, 74] },
    SampleStudent { roll: 104, name: "Sneha Patel", age: 20, branch: "Computer Science", marks: [65, 68, 62, 66, 64] },
    SampleStudent { roll: 105, name: "Vikram Reddy", age: 22, branch: "Civil", marks: [55, 58, 52, 56, 54] },
    SampleStudent { roll: 106, name: "Anjali Desai", age: 20, branch: "Computer Science", marks: [98, 96, 99, 97, 98] },
    SampleStudent { roll: 107, name: "Rahul Verma", age: 21, branch: "Electronics", marks: [88, 85, 90, 87, 89] },
    SampleStudent { roll: 108, name: "Kavya Nair", age: 19, branch: "Mechanical", marks: [78, 80, 75, 79, 77] },
    SampleStudent { roll: 109, name: "Arjun Menon", age: 20, branch: "Computer Science", marks: [92, 94, 91, 93, 95] },
    SampleStudent { roll: 110, name: "Meera Iyer", age: 21, branch: "Electronics", marks: [82, 84, 80, 83, 81] },
];

/// Outcome of a seed run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Number of samples inserted.
    pub added: usize,
    /// Rolls skipped because they already existed.
    pub skipped: Vec<Roll>,
}

impl SeedReport {
    /// Human-readable summary.
    #[must_use]
    pub fn message(&self) -> String {
        if self.skipped.is_empty() {
            format!("Successfully added {} dummy students", self.added)
        } else {
            format!(
                "Successfully added {} dummy students ({} already present)",
                self.added,
                self.skipped.len()
            )
        }
    }
}

/// Insert the built-in sample batch.
pub fn seed(registry: &mut Registry) -> Result<SeedReport, RecordError> {
    seed_with(registry, &SAMPLE_STUDENTS)
}

/// Insert an arbitrary sample batch, skipping duplicates.
pub fn seed_with(
    registry: &mut Registry,
    samples: &[SampleStudent],
) -> Result<SeedReport, RecordError> {
    let mut report = SeedReport::default();
    for sample in samples {
        match registry.create(sample.to_draft()) {
            Ok(_) => report.added += 1,
            Err(RecordError::DuplicateKey(roll)) => report.skipped.push(roll),
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================
