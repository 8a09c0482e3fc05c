//! Store: the indexed object store façade
//!
//! `Store` composes the inspector, the object store and the index store.
//! It owns no key-value state: every operation takes the host store (or a
//! [`Transaction`](weft_storage::Transaction) over it) explicitly, so the
//! caller's state-transition boundary is also the store's.
//!
//! # Example
//!
//! ```ignore
//! let store = Store::<Account>::new()?;
//! let mut kv = MemKv::new();
//!
//! store.create(&mut kv, &Account::new("a", "alice"))?;
//! store.create(&mut kv, &Account::new("b", "alice"))?;
//!
//! let mut cursor = store.filter(&mut kv, &Account::by_owner("alice"))?;
//! while cursor.valid() {
//!     let account = cursor.read()?;
//!     cursor.advance();
//! }
//! ```

use tracing::debug;
use weft_core::{Codec, KvStore, Object, PrimaryKey, Result, Schema, SecondaryKey};
use weft_storage::codec::AnyCodec;

use crate::config::StoreConfig;
use crate::filter::Cursor;
use crate::index::IndexStore;
use crate::inspector::Inspector;
use crate::invariant_violation;
use crate::keyset::intersect;
use crate::object_store::ObjectStore;

/// Indexed object store for objects of type `T`, encoded with `C`
#[derive(Debug, Clone)]
pub struct Store<T, C = AnyCodec> {
    inspector: Inspector<T>,
    objects: ObjectStore<C>,
    index: IndexStore<C>,
    verify_index_on_update: bool,
}

impl<T: Object> Store<T, AnyCodec> {
    /// Store with the default configuration
    pub fn new() -> Result<Self> {
        Self::open(StoreConfig::default())
    }

    /// Store configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid config or schema.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let codec = config.codec()?;
        Self::with_codec(codec, &config)
    }
}

impl<T: Object, C: Codec + Clone> Store<T, C> {
    /// Store using an injected codec; `config.codec` is ignored.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid namespace or schema.
    pub fn with_codec(codec: C, config: &StoreConfig) -> Result<Self> {
        let inspector = Inspector::<T>::new()?;
        let namespace = config.namespace.as_deref();
        let model = inspector.schema().model();
        let objects = ObjectStore::new(namespace, model, codec.clone())?;
        let index = IndexStore::new(namespace, model, codec.clone())?;
        debug!(
            target: "weft::store",
            model,
            namespace = namespace.unwrap_or(""),
            codec = codec.codec_id(),
            indexes = inspector.schema().indexes().len(),
            "Store opened"
        );
        Ok(Self {
            inspector,
            objects,
            index,
            verify_index_on_update: config.verify_index_on_update,
        })
    }

    /// Validated schema of `T`
    pub fn schema(&self) -> &Schema {
        self.inspector.schema()
    }

    /// Underlying object store
    pub fn object_store(&self) -> &ObjectStore<C> {
        &self.objects
    }

    /// Underlying index store
    pub fn index_store(&self) -> &IndexStore<C> {
        &self.index
    }

    /// Store a new object and index it.
    ///
    /// # Errors
    ///
    /// An existing object with the same primary key is an invariant
    /// violation. Any error after inspection is fatal.
    pub fn create<S: KvStore + ?Sized>(&self, kv: &mut S, obj: &T) -> Result<()> {
        let keys = self.inspector.inspect(obj)?;
        self.objects.create(kv, &keys.primary, obj)?;
        self.index.create(kv, &keys.primary, &keys.secondary)?;
        debug!(
            target: "weft::store",
            pk = %keys.primary,
            keys = keys.secondary.len(),
            "Created"
        );
        Ok(())
    }

    /// Load the object stored under `pk`; `None` if absent
    pub fn read<S: KvStore + ?Sized>(&self, kv: &S, pk: &PrimaryKey) -> Result<Option<T>> {
        self.objects.read(kv, pk)
    }

    /// Whether an object is stored under `pk`
    pub fn exists<S: KvStore + ?Sized>(&self, kv: &S, pk: &PrimaryKey) -> Result<bool> {
        self.objects.exists(kv, pk)
    }

    /// Replace an existing object and re-index it.
    ///
    /// The pointers removed are the ones recorded in the index list, not
    /// the ones the new value implies.
    ///
    /// # Errors
    ///
    /// A missing object is an invariant violation. With
    /// `verify_index_on_update`, so is an index list that disagrees with the
    /// stored object.
    pub fn update<S: KvStore + ?Sized>(&self, kv: &mut S, obj: &T) -> Result<()> {
        let keys = self.inspector.inspect(obj)?;
        let pk = &keys.primary;

        if self.verify_index_on_update {
            let old: T = self.objects.read(&*kv, pk)?.ok_or_else(|| {
                invariant_violation(format!("update: object '{}' does not exist", pk))
            })?;
            if self.inspector.primary_key(&old)? != *pk {
                return Err(invariant_violation(format!(
                    "update: object stored under '{}' reports a different primary key",
                    pk
                )));
            }
            let expected = self.inspector.secondary_keys(&old)?;
            let indexed = self.index.secondary_keys(&*kv, pk)?;
            if expected != indexed {
                return Err(invariant_violation(format!(
                    "update: index list for '{}' holds {} keys, stored object reports {}",
                    pk,
                    indexed.len(),
                    expected.len()
                )));
            }
        } else if !self.objects.exists(&*kv, pk)? {
            return Err(invariant_violation(format!(
                "update: object '{}' does not exist",
                pk
            )));
        }

        self.index.delete(kv, pk)?;
        self.objects.update(kv, pk, obj)?;
        self.index.create(kv, pk, &keys.secondary)?;
        debug!(
            target: "weft::store",
            pk = %pk,
            keys = keys.secondary.len(),
            "Updated"
        );
        Ok(())
    }

    /// Remove the object stored under `pk` and its index entries.
    ///
    /// # Errors
    ///
    /// A missing object is an invariant violation.
    pub fn delete<S: KvStore + ?Sized>(&self, kv: &mut S, pk: &PrimaryKey) -> Result<()> {
        if !self.objects.exists(&*kv, pk)? {
            return Err(invariant_violation(format!(
                "delete: object '{}' does not exist",
                pk
            )));
        }
        self.index.delete(kv, pk)?;
        self.objects.delete(kv, pk)?;
        debug!(target: "weft::store", pk = %pk, "Deleted");
        Ok(())
    }

    /// Remove `obj`, identified by its primary key
    pub fn remove<S: KvStore + ?Sized>(&self, kv: &mut S, obj: &T) -> Result<()> {
        let pk = self.inspector.primary_key(obj)?;
        self.delete(kv, &pk)
    }

    /// Cursor over every object matching the populated indexed fields of
    /// `template`, in ascending primary-key order.
    ///
    /// A template with no populated indexed field matches nothing.
    pub fn filter<'s, S: KvStore + ?Sized>(
        &'s self,
        kv: &'s mut S,
        template: &T,
    ) -> Result<Cursor<'s, T, S, C>> {
        let keys = self.filter_keys(&*kv, template)?;
        Ok(Cursor::new(self, kv, keys))
    }

    /// Sorted primary keys matching `template`
    pub fn filter_keys<S: KvStore + ?Sized>(&self, kv: &S, template: &T) -> Result<Vec<PrimaryKey>> {
        let predicates = self.inspector.secondary_keys(template)?;

        let mut sets = Vec::with_capacity(predicates.len());
        for sk in &predicates {
            let set = self.index.collect(kv, sk)?;
            let empty = set.is_empty();
            sets.push(set);
            if empty {
                break;
            }
        }

        let mut keys = intersect(&sets);
        keys.sort();
        debug!(
            target: "weft::filter",
            predicates = predicates.len(),
            matches = keys.len(),
            "Filter evaluated"
        );
        Ok(keys)
    }

    /// Visit every stored primary key in ascending order until `visit`
    /// returns false
    pub fn iterate_keys<S, F>(&self, kv: &S, visit: F) -> Result<()>
    where
        S: KvStore + ?Sized,
        F: FnMut(&PrimaryKey) -> bool,
    {
        self.objects.iterate(kv, visit)
    }

    /// Visit the primary keys holding `sk` until `visit` returns false
    pub fn iterate_index<S, F>(&self, kv: &S, sk: &SecondaryKey, visit: F) -> Result<()>
    where
        S: KvStore + ?Sized,
        F: FnMut(&PrimaryKey) -> bool,
    {
        self.index.iterate(kv, sk, visit)
    }

    /// Secondary keys currently indexed for `pk`.
    ///
    /// # Errors
    ///
    /// A missing index list is an invariant violation.
    pub fn secondary_keys<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        pk: &PrimaryKey,
    ) -> Result<Vec<SecondaryKey>> {
        self.index.secondary_keys(kv, pk)
    }

    /// Number of stored objects
    pub fn count<S: KvStore + ?Sized>(&self, kv: &S) -> Result<usize> {
        self.objects.count(kv)
    }
}
