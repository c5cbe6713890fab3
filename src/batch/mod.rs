//! Write Batch Module
//!
//! In-memory accumulation of writes that have not been committed yet.
//!
//! ## Responsibilities
//! - Buffer Set/Merge/Delete operations in call order
//! - Hold keys already encoded with their tag
//! - Stay untouched when a commit fails, so it can be retried
//!
//! A batch never talks to the engine. [`Store::apply`](crate::Store::apply)
//! installs all of its entries in one write transaction, or none of them.

mod write_batch;

pub use write_batch::WriteBatch;

use bytes::Bytes;

/// Kind of a buffered write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOp {
    /// Overwrite the stored value
    Set,

    /// Combine with the stored value via the merge operator
    Merge,

    /// Remove the key
    Delete,
}

/// One buffered write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub op: BatchOp,

    /// Composite key (tag ++ raw key)
    pub key: Bytes,

    /// Empty for deletes
    pub value: Bytes,
}
