//! WriteBatch implementation
//!
//! Vec-backed, ordered list of pending entries.

use bytes::Bytes;

use super::{BatchEntry, BatchOp};
use crate::key;

/// Ordered, uncommitted writes against one store
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    entries: Vec<BatchEntry>,

    /// Sum of key and value lengths
    size: usize,
}

impl WriteBatch {
    /// Create a new empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an overwrite of `raw_key` under `tag`
    pub fn set(&mut self, tag: u8, raw_key: &[u8], value: &[u8]) {
        self.push(BatchOp::Set, tag, raw_key, value);
    }

    /// Buffer a merge of `value` into `raw_key` under `tag`
    pub fn merge(&mut self, tag: u8, raw_key: &[u8], value: &[u8]) {
        self.push(BatchOp::Merge, tag, raw_key, value);
    }

    /// Buffer a removal of `raw_key` under `tag`
    pub fn delete(&mut self, tag: u8, raw_key: &[u8]) {
        self.push(BatchOp::Delete, tag, raw_key, &[]);
    }

    /// Number of buffered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate size in bytes (keys + values)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entries in the order they were buffered
    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry> {
        self.entries.iter()
    }

    /// Drop every entry (after a successful commit)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    fn push(&mut self, op: BatchOp, tag: u8, raw_key: &[u8], value: &[u8]) {
        let key = Bytes::from(key::encode(tag, raw_key));
        let value = Bytes::copy_from_slice(value);
        self.size += key.len() + value.len();
        self.entries.push(BatchEntry { op, key, value });
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a BatchEntry;
    type IntoIter = std::slice::Iter<'a, BatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
