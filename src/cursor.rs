//! Range Cursor Module
//!
//! Bounded, forward-only iteration over one tag's key range.
//!
//! ## States
//! ```text
//!              next() finds no key
//!   ┌────────┐ ─────────────────────▶ ┌───────────┐
//!   │ Active │        close()         │ Exhausted │
//!   └────────┘ ─────────────────────▶ └───────────┘
//!        │
//!        │ read error
//!        ▼
//!   ┌────────┐
//!   │ Failed │
//!   └────────┘
//! ```
//!
//! Both terminal states are one-way and release the engine cursor. While
//! terminal, `valid()` and `next()` return false, `tag()` returns 0, and
//! `key()`/`value()` return empty slices. A failed scan keeps its error,
//! so callers can tell truncation from normal exhaustion.

use std::marker::PhantomData;

use bytes::Bytes;
use redb::{AccessGuard, Range, ReadOnlyTable};
use tracing::{trace, warn};

use crate::error::{KvError, Result};
use crate::key;
use crate::store::Store;

type EngineTable = ReadOnlyTable<&'static [u8], &'static [u8]>;
type EngineRange = Range<'static, &'static [u8], &'static [u8]>;
type EngineGuard = AccessGuard<'static, &'static [u8]>;

/// Observable cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStatus {
    Active,
    Exhausted,
    Failed,
}

/// A decoded key-value pair read through a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub tag: u8,
    pub key: Bytes,
    pub value: Bytes,
}

/// Live engine cursor plus the entry it is positioned on
struct Active {
    range: EngineRange,
    key: EngineGuard,
    value: EngineGuard,
    _table: EngineTable,
}

enum CursorState {
    Active(Box<Active>),
    Exhausted,
    Failed(KvError),
}

/// Cursor over `[lower, upper)` of one tag, returned by [`Store::range`]
///
/// Borrows the store, so the store cannot be closed while a cursor is alive.
pub struct RangeCursor<'s> {
    state: CursorState,
    _store: PhantomData<&'s Store>,
}

impl<'s> RangeCursor<'s> {
    /// Position on the first entry of `range`, or go terminal right away
    pub(crate) fn open(table: EngineTable, mut range: EngineRange) -> Self {
        let state = match range.next() {
            Some(Ok((key, value))) => CursorState::Active(Box::new(Active {
                range,
                key,
                value,
                _table: table,
            })),
            Some(Err(e)) => {
                warn!(error = %e, "Range cursor failed on first read");
                CursorState::Failed(e.into())
            }
            None => CursorState::Exhausted,
        };

        Self {
            state,
            _store: PhantomData,
        }
    }

    /// True while positioned on an entry
    pub fn valid(&self) -> bool {
        matches!(self.state, CursorState::Active(_))
    }

    /// Advance to the next entry
    ///
    /// Returns false once the range is exhausted or a read fails; the cursor
    /// is terminal from then on.
    pub fn next(&mut self) -> bool {
        let CursorState::Active(active) = &mut self.state else {
            return false;
        };

        match active.range.next() {
            Some(Ok((key, value))) => {
                active.key = key;
                active.value = value;
                true
            }
            Some(Err(e)) => {
                warn!(error = %e, "Range cursor read failed, ending scan");
                self.state = CursorState::Failed(e.into());
                false
            }
            None => {
                trace!("Range cursor exhausted");
                self.state = CursorState::Exhausted;
                false
            }
        }
    }

    /// Tag of the current entry (0 when terminal)
    pub fn tag(&self) -> u8 {
        match &self.state {
            CursorState::Active(active) => key::decode_tag(active.key.value()),
            _ => 0,
        }
    }

    /// Raw key of the current entry, without the tag (empty when terminal)
    pub fn key(&self) -> &[u8] {
        match &self.state {
            CursorState::Active(active) => key::decode_key(active.key.value()),
            _ => &[],
        }
    }

    /// Value of the current entry (empty when terminal)
    pub fn value(&self) -> &[u8] {
        match &self.state {
            CursorState::Active(active) => active.value.value(),
            _ => &[],
        }
    }

    /// Stop iterating and release the engine cursor. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.valid() {
            self.state = CursorState::Exhausted;
        }
    }

    pub fn status(&self) -> CursorStatus {
        match self.state {
            CursorState::Active(_) => CursorStatus::Active,
            CursorState::Exhausted => CursorStatus::Exhausted,
            CursorState::Failed(_) => CursorStatus::Failed,
        }
    }

    /// The read error that ended the scan, if any
    pub fn error(&self) -> Option<&KvError> {
        match &self.state {
            CursorState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, CursorState::Failed(_))
    }

    /// Consume the cursor, surfacing a read failure as an error
    pub fn finish(self) -> Result<()> {
        match self.state {
            CursorState::Failed(e) => Err(e),
            _ => Ok(()),
        }
    }

    /// Drain the remaining entries
    ///
    /// Fails if the scan ends on a read error, discarding what was read.
    pub fn collect_entries(mut self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        while self.valid() {
            entries.push(Entry {
                tag: self.tag(),
                key: Bytes::copy_from_slice(self.key()),
                value: Bytes::copy_from_slice(self.value()),
            });
            self.next();
        }
        self.finish().map(|()| entries)
    }
}
