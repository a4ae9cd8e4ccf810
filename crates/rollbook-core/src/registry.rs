//! # Registry Module
//!
//! The record-store façade: owns a storage backend and runs every write
//! through the derivation engine.
//!
//! ## Storage Backends
//!
//! Registry supports three storage backends:
//! - `InMemory`: `MemoryStore` (fast, volatile)
//! - `Persistent`: `RedbStore` for disk-backed ACID storage
//! - `Custom`: any boxed `StudentStore`, for embedding and tests
//!
//! ## Concurrency
//!
//! Writes take `&mut self` and reads take `&self`. A caller sharing one
//! Registry between threads wraps it in a reader-writer lock, which gives
//! single-writer mutation and snapshot reads.

use crate::storage::RedbStore;
use crate::store::{MemoryStore, StudentStore};
use crate::{RecordError, Roll, StudentDraft, StudentPatch, StudentRecord};
use std::path::Path;

/// Storage backend for a Registry.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
    /// Caller-supplied store.
    Custom(Box<dyn StudentStore + Send + Sync>),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

/// Owner of all student records.
#[derive(Debug, Default)]
pub struct Registry {
    backend: StorageBackend,
}

impl Registry {
    /// Create a new empty registry with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
        })
    }

    /// Create a registry over a caller-supplied store.
    #[must_use]
    pub fn with_store(store: Box<dyn StudentStore + Send + Sync>) -> Self {
        Self {
            backend: StorageBackend::Custom(store),
        }
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Short backend label for logs and status output.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StorageBackend::InMemory(_) => "memory",
            StorageBackend::Persistent(_) => "redb",
            StorageBackend::Custom(_) => "custom",
        }
    }

    fn store(&self) -> &dyn StudentStore {
        match &self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
            StorageBackend::Custom(s) => &**s,
        }
    }

    fn store_mut(&mut self) -> &mut dyn StudentStore {
        match &mut self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
            StorageBackend::Custom(s) => &mut **s,
        }
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Create a record from a draft.
    ///
    /// # Errors
    ///
    /// `RecordError::DuplicateKey` if the roll already exists.
    pub fn create(&mut self, draft: StudentDraft) -> Result<StudentRecord, RecordError> {
        if self.store().contains(draft.roll)? {
            return Err(RecordError::DuplicateKey(draft.roll));
        }
        let record = StudentRecord::from_draft(draft);
        self.store_mut().insert(record.clone())?;
        Ok(record)
    }

    /// Merge a patch into an existing record and re-derive.
    ///
    /// # Errors
    ///
    /// `RecordError::NotFound` if the roll is absent.
    pub fn update(
        &mut self,
        roll: Roll,
        patch: &StudentPatch,
    ) -> Result<StudentRecord, RecordError> {
        let updated = self.get(roll)?.apply(patch);
        self.store_mut().replace(updated.clone())?;
        Ok(updated)
    }

    /// Permanently delete a record.
    ///
    /// # Errors
    ///
    /// `RecordError::NotFound` if the roll is absent.
    pub fn delete(&mut self, roll: Roll) -> Result<(), RecordError> {
        self.store_mut().remove(roll)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// `RecordError::NotFound` if the roll is absent.
    pub fn get(&self, roll: Roll) -> Result<StudentRecord, RecordError> {
        self.store().get(roll)?.ok_or(RecordError::NotFound(roll))
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<StudentRecord>, RecordError> {
        self.store().records()
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize, RecordError> {
        self.store().count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
