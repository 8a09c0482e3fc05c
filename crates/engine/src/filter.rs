//! Cursor: sorted, resumable result of a filter
//!
//! The matching primary keys are materialized and sorted when the cursor is
//! built, so the result order never depends on hash iteration order or on
//! which candidate set was the intersection pivot. Advancing never re-runs
//! the query.
//!
//! The cursor holds the key-value store mutably, so it can update and delete
//! the current match through the full index-maintaining path.

use weft_core::{Codec, KvStore, Object, PrimaryKey, Result};

use crate::invariant_violation;
use crate::store::Store;

/// Position over the primary keys matched by [`Store::filter`]
pub struct Cursor<'s, T, S: ?Sized, C> {
    store: &'s Store<T, C>,
    kv: &'s mut S,
    keys: Vec<PrimaryKey>,
    pos: usize,
}

impl<'s, T: Object, S: KvStore + ?Sized, C: Codec + Clone> Cursor<'s, T, S, C> {
    pub(crate) fn new(store: &'s Store<T, C>, kv: &'s mut S, keys: Vec<PrimaryKey>) -> Self {
        Self {
            store,
            kv,
            keys,
            pos: 0,
        }
    }

    /// Whether the cursor points at a match
    pub fn valid(&self) -> bool {
        self.pos < self.keys.len()
    }

    /// Primary key of the current match
    pub fn key(&self) -> Option<&PrimaryKey> {
        self.keys.get(self.pos)
    }

    /// Total number of matches, including those already passed
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the filter matched nothing
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Every matched primary key, in order
    pub fn keys(&self) -> &[PrimaryKey] {
        &self.keys
    }

    fn current(&self, op: &str) -> Result<&PrimaryKey> {
        self.keys
            .get(self.pos)
            .ok_or_else(|| invariant_violation(format!("cursor {} past the last match", op)))
    }

    /// Decode the current match.
    ///
    /// # Errors
    ///
    /// Reading an invalid cursor, or a match whose object is gone, is an
    /// invariant violation.
    pub fn read(&self) -> Result<T> {
        let pk = self.current("read")?;
        self.store.read(&*self.kv, pk)?.ok_or_else(|| {
            invariant_violation(format!("index points at missing object '{}'", pk))
        })
    }

    /// Replace the current match with `obj`, re-indexing it.
    ///
    /// # Errors
    ///
    /// `obj` must carry the current primary key; anything else is an
    /// invariant violation.
    pub fn update(&mut self, obj: &T) -> Result<()> {
        let pk = self.current("update")?.clone();
        if obj.primary_key() != pk {
            return Err(invariant_violation(format!(
                "cursor update at '{}' with object keyed '{}'",
                pk,
                obj.primary_key()
            )));
        }
        self.store.update(&mut *self.kv, obj)
    }

    /// Delete the current match and its index entries; no-op on an invalid
    /// cursor. The position is left unchanged.
    pub fn delete(&mut self) -> Result<()> {
        let pk = match self.keys.get(self.pos) {
            Some(pk) => pk.clone(),
            None => return Ok(()),
        };
        self.store.delete(&mut *self.kv, &pk)
    }

    /// Move to the next match
    pub fn advance(&mut self) {
        if self.pos < self.keys.len() {
            self.pos += 1;
        }
    }

    /// Read every remaining match, leaving the cursor exhausted
    pub fn collect_objects(&mut self) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(self.keys.len() - self.pos);
        while self.valid() {
            out.push(self.read()?);
            self.advance();
        }
        Ok(out)
    }
}
