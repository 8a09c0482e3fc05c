//! Transaction: buffered write overlay over a base store
//!
//! The host state machine owns the transaction boundary. `Transaction`
//! reproduces that boundary for embedders and tests: every write of one
//! state transition is buffered, reads see the buffered writes first
//! (read-your-writes), and the buffer either reaches the base store in one
//! `commit()` or is discarded by `rollback()` / drop.
//!
//! A fatal error from the engine therefore leaves the base store untouched
//! as long as the caller does not commit.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::ops::Bound;

use tracing::debug;
use weft_core::{KvCursor, KvPair, KvStore, Result};

/// Buffered writes over a base store
pub struct Transaction<'a, S: KvStore + ?Sized> {
    base: &'a mut S,
    /// `Some(value)` = pending write, `None` = pending delete
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> Transaction<'a, S> {
    /// Begin a transaction over `base`
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Apply every buffered operation to the base store, in key order.
    ///
    /// Returns the number of operations applied.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the base store.
    pub fn commit(self) -> Result<usize> {
        let Transaction { base, writes } = self;
        let count = writes.len();
        for (key, op) in writes {
            match op {
                Some(value) => base.set(&key, &value)?,
                None => base.delete(&key)?,
            }
        }
        debug!(target: "weft::txn", ops = count, "Transaction committed");
        Ok(count)
    }

    /// Discard every buffered operation
    pub fn rollback(self) {
        debug!(target: "weft::txn", ops = self.writes.len(), "Transaction rolled back");
    }

    fn overlay_range(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
    ) -> btree_map::Range<'_, Vec<u8>, Option<Vec<u8>>> {
        match end {
            Some(end) if end < start => self
                .writes
                .range::<[u8], _>((Bound::Included(start), Bound::Excluded(start))),
            Some(end) => self
                .writes
                .range::<[u8], _>((Bound::Included(start), Bound::Excluded(end))),
            None => self
                .writes
                .range::<[u8], _>((Bound::Included(start), Bound::Unbounded)),
        }
    }
}

impl<S: KvStore + ?Sized> KvStore for Transaction<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(op) => Ok(op.clone()),
            None => self.base.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        match self.writes.get(key) {
            Some(op) => Ok(op.is_some()),
            None => self.base.has(key),
        }
    }

    fn iterate(&self, start: &[u8], end: Option<&[u8]>) -> Result<KvCursor<'_>> {
        Ok(Box::new(MergeCursor {
            base: self.base.iterate(start, end)?.peekable(),
            overlay: self.overlay_range(start, end).peekable(),
        }))
    }
}

enum Step {
    Base,
    Overlay,
    /// Same key on both sides: the overlay wins
    Shadow,
    Done,
}

/// Merges a base cursor with buffered writes, hiding buffered deletes
struct MergeCursor<'a> {
    base: Peekable<KvCursor<'a>>,
    overlay: Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>,
}

impl MergeCursor<'_> {
    fn step(&mut self) -> Step {
        match (self.base.peek(), self.overlay.peek()) {
            (None, None) => Step::Done,
            // errors surface immediately
            (Some(Err(_)), _) => Step::Base,
            (Some(Ok(_)), None) => Step::Base,
            (None, Some(_)) => Step::Overlay,
            (Some(Ok((base_key, _))), Some((overlay_key, _))) => {
                match base_key.as_slice().cmp(overlay_key.as_slice()) {
                    Ordering::Less => Step::Base,
                    Ordering::Equal => Step::Shadow,
                    Ordering::Greater => Step::Overlay,
                }
            }
        }
    }
}

impl Iterator for MergeCursor<'_> {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = self.step();
            let overlay = match step {
                Step::Done => return None,
                Step::Base => return self.base.next(),
                Step::Shadow => {
                    self.base.next();
                    self.overlay.next()
                }
                Step::Overlay => self.overlay.next(),
            };
            if let Some((key, Some(value))) = overlay {
                return Some(Ok((key.clone(), value.clone())));
            }
            // buffered delete: skip
        }
    }
}
