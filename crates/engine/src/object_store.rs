//! ObjectStore: primary key -> encoded object
//!
//! Objects live in the model's `o` bucket. Encoding goes through
//! [`Object::encode`] / [`Object::decode`], so a type can override its
//! wire representation; by default the injected codec is used directly.

use weft_core::{Codec, KvStore, Object, PrimaryKey, Result};
use weft_storage::{Bucket, BucketKind};

use crate::invariant_violation;

/// Primary records of one model
#[derive(Debug, Clone)]
pub struct ObjectStore<C> {
    bucket: Bucket,
    codec: C,
}

impl<C: Codec> ObjectStore<C> {
    /// Object store for `model`, optionally under `namespace`
    pub fn new(namespace: Option<&str>, model: &str, codec: C) -> Result<Self> {
        Ok(Self {
            bucket: Bucket::new(namespace, model, BucketKind::Objects)?,
            codec,
        })
    }

    /// The bucket objects are stored in
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Store a new object.
    ///
    /// # Errors
    ///
    /// An existing record for `pk` is an invariant violation.
    pub fn create<T: Object, S: KvStore + ?Sized>(
        &self,
        kv: &mut S,
        pk: &PrimaryKey,
        obj: &T,
    ) -> Result<()> {
        let key = self.bucket.key(pk.as_bytes());
        if kv.has(&key)? {
            return Err(invariant_violation(format!(
                "create: object '{}' already exists",
                pk
            )));
        }
        let bytes = obj.encode(&self.codec)?;
        kv.set(&key, &bytes)
    }

    /// Load an object; `None` if absent
    pub fn read<T: Object, S: KvStore + ?Sized>(
        &self,
        kv: &S,
        pk: &PrimaryKey,
    ) -> Result<Option<T>> {
        match kv.get(&self.bucket.key(pk.as_bytes()))? {
            Some(bytes) => Ok(Some(T::decode(&self.codec, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether a record exists for `pk`
    pub fn exists<S: KvStore + ?Sized>(&self, kv: &S, pk: &PrimaryKey) -> Result<bool> {
        kv.has(&self.bucket.key(pk.as_bytes()))
    }

    /// Overwrite an existing object.
    ///
    /// # Errors
    ///
    /// A missing record is an invariant violation.
    pub fn update<T: Object, S: KvStore + ?Sized>(
        &self,
        kv: &mut S,
        pk: &PrimaryKey,
        obj: &T,
    ) -> Result<()> {
        let key = self.bucket.key(pk.as_bytes());
        if !kv.has(&key)? {
            return Err(invariant_violation(format!(
                "update: object '{}' does not exist",
                pk
            )));
        }
        let bytes = obj.encode(&self.codec)?;
        kv.set(&key, &bytes)
    }

    /// Remove an existing object.
    ///
    /// # Errors
    ///
    /// A missing record is an invariant violation.
    pub fn delete<S: KvStore + ?Sized>(&self, kv: &mut S, pk: &PrimaryKey) -> Result<()> {
        let key = self.bucket.key(pk.as_bytes());
        if !kv.has(&key)? {
            return Err(invariant_violation(format!(
                "delete: object '{}' does not exist",
                pk
            )));
        }
        kv.delete(&key)
    }

    /// Visit every primary key in ascending byte order until `visit`
    /// returns false.
    ///
    /// Each call opens a fresh cursor, which is closed on every exit path.
    pub fn iterate<S, F>(&self, kv: &S, mut visit: F) -> Result<()>
    where
        S: KvStore + ?Sized,
        F: FnMut(&PrimaryKey) -> bool,
    {
        for item in self.bucket.scan(kv, &[])? {
            let (key, _) = item?;
            let pk = match self.bucket.strip(&key) {
                Some(suffix) => PrimaryKey::from(suffix),
                None => {
                    return Err(invariant_violation(
                        "object scan returned a key outside its bucket",
                    ))
                }
            };
            if !visit(&pk) {
                break;
            }
        }
        Ok(())
    }

    /// Number of stored objects
    pub fn count<S: KvStore + ?Sized>(&self, kv: &S) -> Result<usize> {
        let mut n = 0;
        self.iterate(kv, |_| {
            n += 1;
            true
        })?;
        Ok(n)
    }
}
