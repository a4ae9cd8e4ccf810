//! # redb-backed Record Storage
//!
//! A disk-backed `StudentStore` using the redb embedded database, providing:
//! - ACID transactions (every mutation is one write transaction)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! Records are encoded with postcard and keyed by insertion sequence, so a
//! table scan yields insertion order. A roll -> sequence index lives both on
//! disk and in an in-memory cache that is only updated after a commit.

use crate::store::StudentStore;
use crate::{RecordError, Roll, StudentRecord};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

/// Table for records: insertion sequence -> postcard-encoded StudentRecord
const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("records");

/// Table for the roll index: Roll(u64) -> insertion sequence
const ROLL_INDEX: TableDefinition<u64, u64> = TableDefinition::new("roll_index");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_SEQ_KEY: &str = "next_seq";

fn io(e: impl Display) -> RecordError {
    RecordError::Storage(e.to_string())
}

fn encode(record: &StudentRecord) -> Result<Vec<u8>, RecordError> {
    postcard::to_allocvec(record).map_err(|e| RecordError::Serialization(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<StudentRecord, RecordError> {
    let record: StudentRecord =
        postcard::from_bytes(bytes).map_err(|e| RecordError::Serialization(e.to_string()))?;
    if !record.is_consistent() {
        return Err(RecordError::Serialization(format!(
            "stored derived fields do not match marks for roll {}",
            record.roll()
        )));
    }
    Ok(record)
}

/// A disk-backed record store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// In-memory cache of roll -> sequence for existence checks and lookups.
    roll_cache: BTreeMap<Roll, u64>,
    /// Next insertion sequence number.
    next_seq: u64,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("roll_cache_size", &self.roll_cache.len())
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a record database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let db = Database::create(path.as_ref()).map_err(io)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io)?;
            let _ = write_txn.open_table(RECORDS).map_err(io)?;
            let _ = write_txn.open_table(ROLL_INDEX).map_err(io)?;
            let _ = write_txn.open_table(METADATA).map_err(io)?;
            write_txn.commit().map_err(io)?;
        }

        let read_txn = db.begin_read().map_err(io)?;

        let next_seq = {
            let table = read_txn.open_table(METADATA).map_err(io)?;
            table
                .get(NEXT_SEQ_KEY)
                .map_err(io)?
                .map(|v| v.value())
                .unwrap_or(0)
        };

        let roll_cache = {
            let table = read_txn.open_table(ROLL_INDEX).map_err(io)?;
            let mut cache = BTreeMap::new();
            for entry in table.iter().map_err(io)? {
                let (key, value) = entry.map_err(io)?;
                cache.insert(Roll(key.value()), value.value());
            }
            cache
        };

        Ok(Self {
            db,
            roll_cache,
            next_seq,
        })
    }

    /// Write one record at a sequence slot in a single transaction.
    fn write_record(&self, seq: u64, record: &StudentRecord) -> Result<(), RecordError> {
        let bytes = encode(record)?;
        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut records = write_txn.open_table(RECORDS).map_err(io)?;
            records.insert(seq, bytes.as_slice()).map_err(io)?;
        }
        write_txn.commit().map_err(io)
    }
}

impl StudentStore for RedbStore {
    fn insert(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        let roll = record.roll();
        if self.roll_cache.contains_key(&roll) {
            return Err(RecordError::DuplicateKey(roll));
        }

        let bytes = encode(&record)?;
        let seq = self.next_seq;
        let next_seq = seq.saturating_add(1);

        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut records = write_txn.open_table(RECORDS).map_err(io)?;
            let mut index = write_txn.open_table(ROLL_INDEX).map_err(io)?;
            let mut meta = write_txn.open_table(METADATA).map_err(io)?;

            records.insert(seq, bytes.as_slice()).map_err(io)?;
            index.insert(roll.value(), seq).map_err(io)?;
            meta.insert(NEXT_SEQ_KEY, next_seq).map_err(io)?;
        }
        write_txn.commit().map_err(io)?;

        // Update in-memory state only after successful commit.
        self.next_seq = next_seq;
        self.roll_cache.insert(roll, seq);
        Ok(())
    }

    fn get(&self, roll: Roll) -> Result<Option<StudentRecord>, RecordError> {
        let Some(&seq) = self.roll_cache.get(&roll) else {
            return Ok(None);
        };

        let read_txn = self.db.begin_read().map_err(io)?;
        let table = read_txn.open_table(RECORDS).map_err(io)?;
        let found = table
            .get(seq)
            .map_err(io)?
            .map(|data| decode(data.value()))
            .transpose()?;
        Ok(found)
    }

    fn replace(&mut self, record: StudentRecord) -> Result<(), RecordError> {
        let roll = record.roll();
        let seq = *self
            .roll_cache
            .get(&roll)
            .ok_or(RecordError::NotFound(roll))?;
        self.write_record(seq, &record)
    }

    fn remove(&mut self, roll: Roll) -> Result<(), RecordError> {
        let seq = *self
            .roll_cache
            .get(&roll)
            .ok_or(RecordError::NotFound(roll))?;

        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut records = write_txn.open_table(RECORDS).map_err(io)?;
            let mut index = write_txn.open_table(ROLL_INDEX).map_err(io)?;
            records.remove(seq).map_err(io)?;
            index.remove(roll.value()).map_err(io)?;
        }
        write_txn.commit().map_err(io)?;

        self.roll_cache.remove(&roll);
        Ok(())
    }

    fn records(&self) -> Result<Vec<StudentRecord>, RecordError> {
        let read_txn = self.db.begin_read().map_err(io)?;
        let table = read_txn.open_table(RECORDS).map_err(io)?;

        let mut records = Vec::with_capacity(self.roll_cache.len());
        for entry in table.iter().map_err(io)? {
            let (_, value) = entry.map_err(io)?;
            records.push(decode(value.value())?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<usize, RecordError> {
        Ok(self.roll_cache.len())
    }

    fn contains(&self, roll: Roll) -> Result<bool, RecordError> {
        Ok(self.roll_cache.contains_key(&roll))
    }
}
