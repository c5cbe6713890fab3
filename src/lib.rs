//! # TagKV
//!
//! Independent logical tables sharing one embedded key-value engine:
//! - One-byte namespace tags prefixed onto every key
//! - Batched writes applied atomically on commit
//! - Durability chosen by the storage path (`.db` means fsync on commit)
//! - Bounded, forward-only range cursors scoped to a tag
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Store Handle                         │
//! │        open / get / set / merge / commit / range / close    │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐                ┌─────────────┐
//!         │ Write Batch │                │Range Cursor │
//!         │  (pending)  │                │ [lo, hi)    │
//!         └──────┬──────┘                └──────┬──────┘
//!                │ commit                       │ seek / next
//!                ▼                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              redb (tag ++ raw key  →  value)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tagkv::Store;
//!
//! # fn main() -> tagkv::Result<()> {
//! let mut store = Store::new();
//! store.open("store.db")?;
//!
//! store.set(b'U', "user:1", "alice")?;
//! store.merge(b'L', "log", "started;")?;
//! store.commit()?;
//!
//! assert_eq!(&store.get(b'U', "user:1")?[..], b"alice");
//!
//! let mut cursor = store.range(b'U', "user:", "user;")?;
//! while cursor.valid() {
//!     println!("{:?} = {:?}", cursor.key(), cursor.value());
//!     cursor.next();
//! }
//! cursor.finish()?;
//!
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod key;
pub mod merge;
pub mod batch;
pub mod cursor;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, Durability, DURABLE_SUFFIX};
pub use batch::WriteBatch;
pub use cursor::{CursorStatus, Entry, RangeCursor};
pub use merge::{Concatenate, MergeOperator};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TagKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
