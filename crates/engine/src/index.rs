//! IndexStore: secondary-key pointers and per-object index lists
//!
//! Two buckets per model:
//!
//! ```text
//! i: <prefix> <encoded-value> <primary-key>  -> (empty)
//! l: <primary-key>                           -> codec(Vec<marshaled key>)
//! ```
//!
//! A pointer's existence is the fact; it carries no payload. Encoded values
//! are separator-terminated and prefix-free, so scanning the pointer bucket
//! for one marshaled key yields exactly the primary keys holding that value.
//!
//! The index list is the authoritative record of what was indexed for a
//! primary key. Delete consults it instead of the (possibly changed) object,
//! so stale pointers are always found.

use tracing::trace;
use weft_core::{Codec, KvStore, PrimaryKey, Result, SecondaryKey};
use weft_storage::{Bucket, BucketKind};

use crate::invariant_violation;
use crate::keyset::KeySet;

/// Secondary index of one model
#[derive(Debug, Clone)]
pub struct IndexStore<C> {
    pointers: Bucket,
    lists: Bucket,
    codec: C,
}

impl<C: Codec> IndexStore<C> {
    /// Index store for `model`, optionally under `namespace`
    pub fn new(namespace: Option<&str>, model: &str, codec: C) -> Result<Self> {
        Ok(Self {
            pointers: Bucket::new(namespace, model, BucketKind::IndexPointers)?,
            lists: Bucket::new(namespace, model, BucketKind::IndexLists)?,
            codec,
        })
    }

    fn pointer_key(&self, sk: &SecondaryKey, pk: &PrimaryKey) -> Vec<u8> {
        let prefix = [sk.prefix()];
        self.pointers
            .key_from_parts(&[&prefix[..], sk.encoded(), pk.as_bytes()])
    }

    /// Index `keys` for `pk`: one pointer per key, then the sorted list.
    ///
    /// The list is written even when `keys` is empty, so every stored
    /// object has one.
    ///
    /// # Errors
    ///
    /// An existing index list for `pk` is an invariant violation.
    pub fn create<S: KvStore + ?Sized>(
        &self,
        kv: &mut S,
        pk: &PrimaryKey,
        keys: &[SecondaryKey],
    ) -> Result<()> {
        let list_key = self.lists.key(pk.as_bytes());
        if kv.has(&list_key)? {
            return Err(invariant_violation(format!(
                "index create: list for '{}' already exists",
                pk
            )));
        }

        let mut list: Vec<Vec<u8>> = Vec::with_capacity(keys.len());
        for sk in keys {
            kv.set(&self.pointer_key(sk, pk), &[])?;
            list.push(sk.marshal());
        }
        list.sort();
        list.dedup();

        let bytes = self.codec.encode(&list)?;
        kv.set(&list_key, &bytes)?;
        trace!(target: "weft::index", pk = %pk, keys = list.len(), "Indexed");
        Ok(())
    }

    /// Remove every pointer recorded for `pk`, then its list.
    ///
    /// # Errors
    ///
    /// A missing index list is an invariant violation.
    pub fn delete<S: KvStore + ?Sized>(&self, kv: &mut S, pk: &PrimaryKey) -> Result<()> {
        let keys = self.secondary_keys(kv, pk)?;
        for sk in &keys {
            kv.delete(&self.pointer_key(sk, pk))?;
        }
        kv.delete(&self.lists.key(pk.as_bytes()))?;
        trace!(target: "weft::index", pk = %pk, keys = keys.len(), "Unindexed");
        Ok(())
    }

    /// Index list for `pk`, or `None` if there is none
    pub fn read_list<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        pk: &PrimaryKey,
    ) -> Result<Option<Vec<SecondaryKey>>> {
        let bytes = match kv.get(&self.lists.key(pk.as_bytes()))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let list: Vec<Vec<u8>> = self.codec.decode(&bytes)?;
        let keys = list
            .iter()
            .map(|raw| SecondaryKey::unmarshal(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(keys))
    }

    /// Secondary keys currently indexed for `pk`, in sorted order.
    ///
    /// # Errors
    ///
    /// A missing index list is an invariant violation.
    pub fn secondary_keys<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        pk: &PrimaryKey,
    ) -> Result<Vec<SecondaryKey>> {
        self.read_list(kv, pk)?.ok_or_else(|| {
            invariant_violation(format!("index list for '{}' is missing", pk))
        })
    }

    /// Visit the primary keys holding `sk`, in store order, until `visit`
    /// returns false.
    ///
    /// Each call opens a fresh cursor, which is closed on every exit path.
    pub fn iterate<S, F>(&self, kv: &S, sk: &SecondaryKey, mut visit: F) -> Result<()>
    where
        S: KvStore + ?Sized,
        F: FnMut(&PrimaryKey) -> bool,
    {
        let marshaled = sk.marshal();
        for item in self.pointers.scan(kv, &marshaled)? {
            let (key, _) = item?;
            let pk = match self
                .pointers
                .strip(&key)
                .and_then(|rest| rest.strip_prefix(marshaled.as_slice()))
            {
                Some(suffix) if !suffix.is_empty() => PrimaryKey::from(suffix),
                _ => {
                    return Err(invariant_violation(format!(
                        "malformed index pointer under {}",
                        sk
                    )))
                }
            };
            if !visit(&pk) {
                break;
            }
        }
        Ok(())
    }

    /// Every primary key holding `sk`
    pub fn collect<S: KvStore + ?Sized>(&self, kv: &S, sk: &SecondaryKey) -> Result<KeySet> {
        let mut set = KeySet::new();
        self.iterate(kv, sk, |pk| {
            set.insert(pk.clone());
            true
        })?;
        Ok(set)
    }
}
