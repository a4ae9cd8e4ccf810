//! # Core Type Definitions
//!
//! This module contains all core types for the Rollbook record store:
//! - Identifiers and scalar fields (`Roll`, `Mark`, `Marks`)
//! - Derived fields (`Percentage`, `Grade`)
//! - Write inputs (`StudentDraft`, `StudentPatch`)
//! - The stored record (`StudentRecord`)
//! - Error types (`RecordError`)
//!
//! ## Derived Field Guarantees
//!
//! `StudentRecord` has private fields. The only ways to build one are
//! `StudentRecord::from_draft` and `StudentRecord::apply`, and both run the
//! derivation engine, so `percentage` and `grade` always match the marks.

use crate::derivation::derive;
use crate::primitives::{
    HUNDREDTHS_PER_PERCENT, MARK_COUNT, MAX_BRANCH_LENGTH, MAX_MARK, MAX_NAME_LENGTH, MIN_MARK,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ROLL NUMBER
// =============================================================================

/// Roll number: the unique, immutable primary key of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Roll(pub u64);

impl Roll {
    /// Get the raw roll number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// MARKS
// =============================================================================

/// A single mark, always within `MIN_MARK..=MAX_MARK`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Mark(u8);

impl Mark {
    /// Clamp a raw input value into the storable range.
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        let bounded = raw.clamp(i64::from(MIN_MARK), i64::from(MAX_MARK));
        Self(bounded as u8)
    }

    /// Whether a raw input would be stored unchanged.
    #[must_use]
    pub fn in_range(raw: i64) -> bool {
        (i64::from(MIN_MARK)..=i64::from(MAX_MARK)).contains(&raw)
    }

    /// Get the mark value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// The five marks of a record, in field order (`mark1` first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Marks([Mark; MARK_COUNT]);

impl Marks {
    /// Build marks from raw inputs, clamping each into range.
    #[must_use]
    pub fn from_raw(raw: [i64; MARK_COUNT]) -> Self {
        Self(raw.map(Mark::clamped))
    }

    /// Mark values in field order.
    #[must_use]
    pub fn values(&self) -> [u8; MARK_COUNT] {
        self.0.map(Mark::value)
    }

    /// Sum of all marks. At most `MAX_MARK * MARK_COUNT`, so it never overflows.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|m| u32::from(m.value())).sum()
    }
}

// =============================================================================
// DERIVED FIELDS
// =============================================================================

/// A percentage held exactly as integer hundredths (`9000` is `90.00%`).
///
/// Marks are integers, so `sum / 5` always has an exact hundredths
/// representation. Rounding only happens when rendering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Percentage(u32);

impl Percentage {
    /// Create a percentage from hundredths of a percent.
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Raw hundredths value.
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Value as a float, for JSON output.
    #[must_use]
    #[allow(clippy::float_arithmetic)]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(HUNDREDTHS_PER_PERCENT)
    }
}

impl fmt::Display for Percentage {
    /// Two-decimal rendering, e.g. `89.80`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / HUNDREDTHS_PER_PERCENT,
            self.0 % HUNDREDTHS_PER_PERCENT
        )
    }
}

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Single-letter form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WRITE INPUTS
// =============================================================================

/// Everything needed to create a record. Missing optional fields keep
/// their defaults (empty text, zero age, zero marks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub roll: Roll,
    pub name: String,
    pub age: u32,
    pub branch: String,
    /// Raw marks as supplied; clamped when the record is built.
    pub marks: [i64; MARK_COUNT],
}

impl StudentDraft {
    /// A draft with only the roll number set.
    #[must_use]
    pub fn new(roll: Roll) -> Self {
        Self {
            roll,
            name: String::new(),
            age: 0,
            branch: String::new(),
            marks: [0; MARK_COUNT],
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_marks(mut self, marks: [i64; MARK_COUNT]) -> Self {
        self.marks = marks;
        self
    }

    /// Whether any mark will be clamped on creation.
    #[must_use]
    pub fn has_out_of_range_marks(&self) -> bool {
        self.marks.iter().any(|&m| !Mark::in_range(m))
    }
}

/// A partial update. `None` fields keep the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub branch: Option<String>,
    /// `marks[0]` is `mark1`.
    pub marks: [Option<i64>; MARK_COUNT],
}

impl StudentPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.branch.is_none()
            && self.marks.iter().all(Option::is_none)
    }

    /// Whether any supplied mark will be clamped.
    #[must_use]
    pub fn has_out_of_range_marks(&self) -> bool {
        self.marks.iter().flatten().any(|&m| !Mark::in_range(m))
    }
}

// =============================================================================
// STUDENT RECORD
// =============================================================================

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    roll: Roll,
    name: String,
    age: u32,
    branch: String,
    marks: Marks,
    percentage: Percentage,
    grade: Grade,
}

impl StudentRecord {
    /// Build a record from a draft: truncate text, clamp marks, derive.
    #[must_use]
    pub fn from_draft(draft: StudentDraft) -> Self {
        let marks = Marks::from_raw(draft.marks);
        let (percentage, grade) = derive(&marks);
        Self {
            roll: draft.roll,
            name: truncate_chars(&draft.name, MAX_NAME_LENGTH),
            age: draft.age,
            branch: truncate_chars(&draft.branch, MAX_BRANCH_LENGTH),
            marks,
            percentage,
            grade,
        }
    }

    /// Merge a patch over this record and re-derive. The roll never changes.
    #[must_use]
    pub fn apply(&self, patch: &StudentPatch) -> Self {
        let current = self.marks.values();
        let mut raw = [0i64; MARK_COUNT];
        for (i, slot) in raw.iter_mut().enumerate() {
            *slot = patch.marks[i].unwrap_or(i64::from(current[i]));
        }

        Self::from_draft(StudentDraft {
            roll: self.roll,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            age: patch.age.unwrap_or(self.age),
            branch: patch.branch.clone().unwrap_or_else(|| self.branch.clone()),
            marks: raw,
        })
    }

    /// Whether the stored derived fields match the marks.
    ///
    /// Always true for records built in-process; used to reject tampered
    /// or corrupted rows loaded from disk.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        derive(&self.marks) == (self.percentage, self.grade)
    }

    #[must_use]
    pub fn roll(&self) -> Roll {
        self.roll
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    #[must_use]
    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    #[must_use]
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field is missing or a field is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record with this roll number already exists.
    #[error("Student with roll number {0} already exists")]
    DuplicateKey(Roll),

    /// No record with this roll number exists.
    #[error("Student {0} not found")]
    NotFound(Roll),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================
