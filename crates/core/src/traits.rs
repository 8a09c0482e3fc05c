//! Core traits for the host key-value store abstraction
//!
//! The ordered byte store is supplied by the host state machine. This module
//! defines the narrow interface the object store consumes, so the in-memory
//! backend in `weft-storage`, a transactional overlay, or a host adapter can
//! be swapped without touching the engine.

use crate::error::Result;

/// A key/value pair produced by a cursor
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered cursor over a key range.
///
/// Dropping the cursor closes it, so every exit path (exhaustion, early
/// break, `?` propagation) releases the underlying iterator.
pub type KvCursor<'a> = Box<dyn Iterator<Item = Result<KvPair>> + 'a>;

/// Ordered byte-oriented key-value store
///
/// All mutation happens inside one serialized state transition, so methods
/// take `&mut self` for writes and no implementation needs to be `Sync`.
/// Reads must observe earlier writes of the same transition.
///
/// # Examples
///
/// ```ignore
/// use weft_core::KvStore;
/// use weft_storage::MemKv;
///
/// let mut kv = MemKv::new();
/// kv.set(b"k", b"v")?;
/// assert!(kv.has(b"k")?);
/// ```
pub trait KvStore {
    /// Get the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Whether `key` has a value
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate keys in `[start, end)` in ascending byte order
    ///
    /// `end = None` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot be opened.
    fn iterate(&self, start: &[u8], end: Option<&[u8]>) -> Result<KvCursor<'_>>;
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        (**self).has(key)
    }

    fn iterate(&self, start: &[u8], end: Option<&[u8]>) -> Result<KvCursor<'_>> {
        (**self).iterate(start, end)
    }
}

/// Exclusive upper bound for a scan over every key starting with `prefix`.
///
/// Returns `None` when no such bound exists (empty prefix or all `0xFF`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xFF {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
