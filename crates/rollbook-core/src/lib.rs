//! # rollbook-core
//!
//! The student record engine for Rollbook.
//!
//! This crate owns everything that decides what a stored record looks like:
//! - `types`: roll numbers, marks, derived fields, write inputs, errors
//! - `derivation`: the single place percentage and grade are computed
//! - `store` / `storage`: the `StudentStore` seam with memory and redb backends
//! - `registry`: create, update, delete and read through one façade
//! - `query`: listing, ranking and counting
//! - `seed`: the built-in sample batch
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Deterministic: `BTreeMap` everywhere, integer hundredths for percentages
//! - Callers cannot set derived fields; every write re-derives them

// =============================================================================
// MODULES
// =============================================================================

pub mod derivation;
pub mod primitives;
pub mod query;
pub mod registry;
pub mod seed;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Grade, Mark, Marks, Percentage, RecordError, Roll, StudentDraft, StudentPatch, StudentRecord,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use derivation::{derive, grade_for, percentage_of};
pub use query::{SortOrder, by_standing, get_count, get_one, list, list_all, list_sorted};
pub use registry::{Registry, StorageBackend};
pub use seed::{SAMPLE_STUDENTS, SampleStudent, SeedReport, seed, seed_with};
pub use storage::RedbStore;
pub use store::{MemoryStore, StudentStore};
