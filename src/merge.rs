//! Merge Operator Module
//!
//! Combines a merge operand with the value already stored under a key.
//!
//! Operators run at commit time, once per merge entry and in batch order,
//! inside the commit's write transaction. `existing` reflects every earlier
//! entry of the same batch. An operator must be associative: merging `a`, `b`
//! and `c` in turn yields the same value as merging `a` and then the merge of
//! `b` and `c`.

use crate::error::Result;

/// Value-combining function applied by [`Store::commit`](crate::Store::commit)
pub trait MergeOperator: Send + Sync {
    /// Operator name, used in logs
    fn name(&self) -> &str;

    /// Merge `operand` into `existing` (None when the key holds no value)
    ///
    /// Returning an error aborts the whole commit.
    fn merge(&self, key: &[u8], existing: Option<&[u8]>, operand: &[u8]) -> Result<Vec<u8>>;
}

/// Appends each operand after the existing value
#[derive(Debug, Default, Clone, Copy)]
pub struct Concatenate;

impl MergeOperator for Concatenate {
    fn name(&self) -> &str {
        "concatenate"
    }

    fn merge(&self, _key: &[u8], existing: Option<&[u8]>, operand: &[u8]) -> Result<Vec<u8>> {
        let existing = existing.unwrap_or_default();
        let mut merged = Vec::with_capacity(existing.len() + operand.len());
        merged.extend_from_slice(existing);
        merged.extend_from_slice(operand);
        Ok(merged)
    }
}
