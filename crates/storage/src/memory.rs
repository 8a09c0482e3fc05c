//! MemKv: in-memory ordered key-value store
//!
//! This module implements the `KvStore` trait using:
//! - `BTreeMap<Vec<u8>, Vec<u8>>` for ordered byte keys
//! - An `AtomicUsize` counter of cursors that are still open
//!
//! # Design Notes
//!
//! - **No locking**: writes take `&mut self`; the host serializes state
//!   transitions, so there is never a concurrent writer.
//! - **Borrowed cursors**: a cursor borrows the map and decrements the open
//!   counter when dropped. `open_cursors()` lets tests assert that every
//!   iteration path released its cursor.
//! - **Rollback by snapshot**: `Clone` produces an independent copy, which a
//!   host can keep to restore state after an aborted transition.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft_core::{prefix_end, KvCursor, KvPair, KvStore, Result};

/// In-memory ordered byte store
#[derive(Debug, Default)]
pub struct MemKv {
    /// The main data store: ordered map from key to value
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Number of cursors handed out and not yet dropped
    open_cursors: Arc<AtomicUsize>,
}

impl MemKv {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of cursors that have been opened and not yet closed
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Collect every pair whose key starts with `prefix`
    ///
    /// Debugging and test helper; the engine always goes through `iterate`.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Vec<KvPair> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn range<'a>(
        &'a self,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> btree_map::Range<'a, Vec<u8>, Vec<u8>> {
        match end {
            // BTreeMap::range panics on inverted bounds
            Some(end) if end < start => self
                .data
                .range::<[u8], _>((Bound::Included(start), Bound::Excluded(start))),
            Some(end) => self
                .data
                .range::<[u8], _>((Bound::Included(start), Bound::Excluded(end))),
            None => self
                .data
                .range::<[u8], _>((Bound::Included(start), Bound::Unbounded)),
        }
    }
}

impl Clone for MemKv {
    /// Copies the data; the clone starts with no open cursors
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl KvStore for MemKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    fn iterate(&self, start: &[u8], end: Option<&[u8]>) -> Result<KvCursor<'_>> {
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemCursor {
            range: self.range(start, end),
            _guard: CursorGuard(Arc::clone(&self.open_cursors)),
        }))
    }
}

/// Decrements the open-cursor counter when the cursor is closed
#[derive(Debug)]
struct CursorGuard(Arc<AtomicUsize>);

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MemCursor<'a> {
    range: btree_map::Range<'a, Vec<u8>, Vec<u8>>,
    _guard: CursorGuard,
}

impl Iterator for MemCursor<'_> {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|(k, v)| Ok((k.clone(), v.clone())))
    }
}
