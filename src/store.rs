//! Store Module
//!
//! The store handle: owns the engine instance and the live write batch.
//!
//! ## Responsibilities
//! - Open/close the engine and pick the durability mode once
//! - Encode tagged keys for every read and write
//! - Buffer writes and apply them atomically on commit
//! - Hand out bounded range cursors

use std::fs;
use std::path::Path;

use bytes::Bytes;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use tracing::{debug, info, warn};

use crate::batch::{BatchOp, WriteBatch};
use crate::config::{Config, Durability};
use crate::cursor::RangeCursor;
use crate::error::{KvError, Result};
use crate::key;
use crate::merge::MergeOperator;

/// Single engine table shared by every tag
const KEYSPACE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tagkv");

/// Engine instance plus the config it was opened with
struct OpenStore {
    db: Database,
    config: Config,
}

/// Handle over one embedded engine, shared by any number of tags
///
/// ## Lifecycle
/// `new()` gives an unopened handle. `open` makes it active; a second `open`
/// fails with [`KvError::AlreadyOpen`]. `close` returns it to the unopened
/// state, after which it can be opened again.
///
/// ## Concurrency
/// - `set/merge/delete/commit` take `&mut self`: the handle's batch is a
///   single buffer, so writers on one handle are serialized by the caller
/// - `get/range/apply/flush` take `&self` and may run from many threads;
///   the engine serializes write transactions and snapshots each cursor
#[derive(Default)]
pub struct Store {
    inner: Option<OpenStore>,

    /// Writes buffered by `set/merge/delete` until `commit`
    batch: WriteBatch,
}

impl Store {
    /// Create an unopened handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the engine at `path`, inferring durability from its suffix
    ///
    /// A path ending in `.db` commits with fsync; any other path commits
    /// without it.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.open_with(Config::new(path.as_ref()))
    }

    /// Open the engine with an explicit config
    pub fn open_with(&mut self, config: Config) -> Result<()> {
        if self.inner.is_some() {
            return Err(KvError::AlreadyOpen);
        }

        if let Some(parent) = config.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut builder = Database::builder();
        if let Some(bytes) = config.cache_size {
            builder.set_cache_size(bytes);
        }
        let db = builder.create(&config.path)?;

        // Create the table eagerly so read transactions never miss it
        let write_txn = db.begin_write()?;
        {
            let _t = write_txn.open_table(KEYSPACE)?;
        }
        write_txn.commit()?;

        info!(
            path = %config.path.display(),
            durability = ?config.durability,
            merge_operator = config.merge_operator.name(),
            "Opened store"
        );

        self.batch.clear();
        self.inner = Some(OpenStore { db, config });
        Ok(())
    }

    /// Point lookup of `raw_key` under `tag`
    ///
    /// Returns [`KvError::NotFound`] when the key is absent. Uncommitted
    /// writes are not visible.
    pub fn get(&self, tag: u8, raw_key: impl AsRef<[u8]>) -> Result<Bytes> {
        let open = self.open_ref()?;
        let storage_key = key::encode(tag, raw_key.as_ref());

        let read_txn = open.db.begin_read()?;
        let table = read_txn.open_table(KEYSPACE)?;
        match table.get(storage_key.as_slice())? {
            Some(value) => Ok(Bytes::copy_from_slice(value.value())),
            None => Err(KvError::NotFound),
        }
    }

    /// Buffer an overwrite; nothing reaches the engine until `commit`
    pub fn set(
        &mut self,
        tag: u8,
        raw_key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.open_ref()?;
        self.batch.set(tag, raw_key.as_ref(), value.as_ref());
        Ok(())
    }

    /// Buffer a merge; the merge operator combines values at commit time
    pub fn merge(
        &mut self,
        tag: u8,
        raw_key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.open_ref()?;
        self.batch.merge(tag, raw_key.as_ref(), value.as_ref());
        Ok(())
    }

    /// Buffer a removal
    pub fn delete(&mut self, tag: u8, raw_key: impl AsRef<[u8]>) -> Result<()> {
        self.open_ref()?;
        self.batch.delete(tag, raw_key.as_ref());
        Ok(())
    }

    /// Atomically apply the handle's batch
    ///
    /// The batch is cleared only on success; after a failure it still holds
    /// every entry and the engine holds none of them.
    pub fn commit(&mut self) -> Result<()> {
        let open = self.inner.as_ref().ok_or(KvError::NotOpen)?;
        Self::write(open, &self.batch)?;
        self.batch.clear();
        Ok(())
    }

    /// A fresh batch, independent of the handle's own
    pub fn batch(&self) -> WriteBatch {
        WriteBatch::new()
    }

    /// Atomically apply an independent batch, clearing it on success
    pub fn apply(&self, batch: &mut WriteBatch) -> Result<()> {
        let open = self.open_ref()?;
        Self::write(open, batch)?;
        batch.clear();
        Ok(())
    }

    /// Cursor over `[from, till)` under `tag`, in ascending key order
    ///
    /// Reversed bounds are swapped. An empty range gives an already-invalid
    /// cursor, not an error.
    ///
    /// The cursor borrows the store, so `set/merge/commit` are unavailable
    /// while it is alive. To write during a scan, fill a [`Store::batch`] and
    /// [`Store::apply`] it; the cursor keeps reading its own snapshot.
    pub fn range(
        &self,
        tag: u8,
        from: impl AsRef<[u8]>,
        till: impl AsRef<[u8]>,
    ) -> Result<RangeCursor<'_>> {
        let open = self.open_ref()?;
        let (lower, upper) = key::encode_range(tag, from.as_ref(), till.as_ref());

        let read_txn = open.db.begin_read()?;
        let table = read_txn.open_table(KEYSPACE)?;
        let range = table.range(lower.as_slice()..upper.as_slice())?;
        Ok(RangeCursor::open(table, range))
    }

    /// Make every earlier commit durable
    ///
    /// Only needed in fast mode; durable-mode commits are already on disk.
    pub fn flush(&self) -> Result<()> {
        let open = self.open_ref()?;
        Self::persist(&open.db)?;
        debug!(path = %open.config.path.display(), "Flushed store");
        Ok(())
    }

    /// Release the engine. Idempotent; the handle can be opened again.
    ///
    /// Uncommitted entries are discarded. In fast mode the last commits are
    /// made durable first.
    pub fn close(&mut self) -> Result<()> {
        let Some(open) = self.inner.take() else {
            return Ok(());
        };

        if !self.batch.is_empty() {
            warn!(
                pending = self.batch.len(),
                "Discarding uncommitted entries on close"
            );
            self.batch.clear();
        }

        let result = match open.config.durability {
            Durability::Fast => Self::persist(&open.db),
            Durability::Durable => Ok(()),
        };

        info!(path = %open.config.path.display(), "Closed store");
        drop(open);
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Durability of the open store
    pub fn durability(&self) -> Option<Durability> {
        self.inner.as_ref().map(|open| open.config.durability)
    }

    /// Path of the open store
    pub fn path(&self) -> Option<&Path> {
        self.inner.as_ref().map(|open| open.config.path.as_path())
    }

    /// Number of buffered, uncommitted entries
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_ref(&self) -> Result<&OpenStore> {
        self.inner.as_ref().ok_or(KvError::NotOpen)
    }

    /// Apply `batch` in one write transaction, aborting it on any error
    fn write(open: &OpenStore, batch: &WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let durability = open.config.durability;
        let mut write_txn = open.db.begin_write()?;
        write_txn.set_durability(durability.as_redb());

        let merge_operator = open.config.merge_operator.as_ref();
        if let Err(e) = Self::write_entries(&write_txn, batch, merge_operator) {
            warn!(error = %e, entries = batch.len(), "Commit failed, batch kept");
            if let Err(abort_err) = write_txn.abort() {
                warn!(error = %abort_err, "Failed to abort write transaction");
            }
            return Err(e);
        }

        if let Err(e) = write_txn.commit() {
            warn!(error = %e, entries = batch.len(), "Commit failed, batch kept");
            return Err(e.into());
        }

        debug!(
            entries = batch.len(),
            bytes = batch.size(),
            ?durability,
            "Committed batch"
        );
        Ok(())
    }

    fn write_entries(
        write_txn: &WriteTransaction,
        batch: &WriteBatch,
        merge_operator: &dyn MergeOperator,
    ) -> Result<()> {
        let mut table = write_txn.open_table(KEYSPACE)?;
        for entry in batch {
            let storage_key = &entry.key[..];
            match entry.op {
                BatchOp::Set => {
                    table.insert(storage_key, &entry.value[..])?;
                }
                BatchOp::Merge => {
                    let existing = table.get(storage_key)?.map(|v| v.value().to_vec());
                    let merged =
                        merge_operator.merge(storage_key, existing.as_deref(), &entry.value)?;
                    table.insert(storage_key, merged.as_slice())?;
                }
                BatchOp::Delete => {
                    table.remove(storage_key)?;
                }
            }
        }
        Ok(())
    }

    /// Durable empty commit; persists every earlier non-durable commit
    fn persist(db: &Database) -> Result<()> {
        let mut write_txn = db.begin_write()?;
        write_txn.set_durability(redb::Durability::Immediate);
        write_txn.commit()?;
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to close store on drop");
        }
    }
}
