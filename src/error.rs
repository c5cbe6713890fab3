//! Error types for TagKV
//!
//! Provides a unified error type for all operations. Engine errors are carried
//! unchanged so callers can match on the exact redb failure.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for TagKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Handle Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("the database is already open")]
    AlreadyOpen,

    #[error("the database is not open")]
    NotOpen,

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("redb error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Merge Errors
    // -------------------------------------------------------------------------
    #[error("Merge failed: {0}")]
    Merge(String),
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

impl KvError {
    /// True for the expected "absent key" outcome of a point lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound)
    }
}
