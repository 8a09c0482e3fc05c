//! Inspector: derives and checks the keys of an object
//!
//! The object type reports its keys through [`Object`]; the inspector checks
//! them against the type's validated [`Schema`] before anything is written.

use std::marker::PhantomData;

use weft_core::{Error, Object, PrimaryKey, Result, Schema, SecondaryKey, PRIMARY_PARTITION};

use crate::invariant_violation;

/// Keys of one object instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKeys {
    /// Object identity
    pub primary: PrimaryKey,
    /// Indexed values, sorted and de-duplicated
    pub secondary: Vec<SecondaryKey>,
}

/// Key extraction for objects of type `T`
#[derive(Debug, Clone)]
pub struct Inspector<T> {
    schema: Schema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Object> Inspector<T> {
    /// Build an inspector for `T`, validating its schema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `T::schema()` is invalid.
    pub fn new() -> Result<Self> {
        let schema = T::schema();
        schema.validate()?;
        Ok(Self {
            schema,
            _marker: PhantomData,
        })
    }

    /// The validated schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Both key kinds of `obj`
    pub fn inspect(&self, obj: &T) -> Result<ObjectKeys> {
        Ok(ObjectKeys {
            primary: self.primary_key(obj)?,
            secondary: self.secondary_keys(obj)?,
        })
    }

    /// Primary key of an object about to be stored.
    ///
    /// # Errors
    ///
    /// An empty primary key would alias the bucket prefix itself, so it is
    /// an invariant violation.
    pub fn primary_key(&self, obj: &T) -> Result<PrimaryKey> {
        let pk = obj.primary_key();
        if pk.is_empty() {
            return Err(invariant_violation(format!(
                "object of model '{}' has an empty primary key",
                self.schema.model()
            )));
        }
        Ok(pk)
    }

    /// Secondary keys of `obj`, sorted by marshaled bytes and de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a key uses the reserved primary
    /// partition or a prefix the schema does not declare.
    pub fn secondary_keys(&self, obj: &T) -> Result<Vec<SecondaryKey>> {
        let mut keys = obj.secondary_keys();
        for key in &keys {
            if key.prefix() == PRIMARY_PARTITION {
                return Err(Error::config(format!(
                    "model '{}' reported a secondary key in the reserved primary partition",
                    self.schema.model()
                )));
            }
            if self.schema.index_for(key.prefix()).is_none() {
                return Err(Error::config(format!(
                    "model '{}' reported a secondary key with undeclared prefix {:#04x}",
                    self.schema.model(),
                    key.prefix()
                )));
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
