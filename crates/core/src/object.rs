//! Stored object capability and schema declarations
//!
//! An object type declares its model name and indexes once through
//! [`Object::schema`], and reports its keys through [`Object::primary_key`]
//! and [`Object::secondary_keys`]. Everything is resolved at compile time:
//!
//! - exactly one primary key per object, because `primary_key` returns one;
//! - only byte-like fields become key material, because only they implement
//!   [`KeyMaterial`].
//!
//! The remaining configuration mistakes (reserved or duplicate prefixes, bad
//! model names) are caught by [`Schema::validate`] when a store is built.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::key::{PrimaryKey, SecondaryKey, PRIMARY_PARTITION};

/// Scalar byte-like field usable as key material.
///
/// Implemented for strings and byte buffers only. Composite, numeric and
/// optional types are deliberately absent: their byte form would be
/// ambiguous.
pub trait KeyMaterial {
    /// Raw bytes of the field value
    fn key_bytes(&self) -> &[u8];
}

impl KeyMaterial for str {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyMaterial for String {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyMaterial for [u8] {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl KeyMaterial for Vec<u8> {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl<T: KeyMaterial + ?Sized> KeyMaterial for &T {
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

/// A value the store can persist and index.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Default)]
/// struct Account { name: String, owner: String }
///
/// impl Object for Account {
///     fn schema() -> Schema {
///         Schema::new("account").index("owner", 1)
///     }
///     fn primary_key(&self) -> PrimaryKey {
///         PrimaryKey::from(self.name.as_str())
///     }
///     fn secondary_keys(&self) -> Vec<SecondaryKey> {
///         SecondaryKey::from_field(1, &self.owner).into_iter().collect()
///     }
/// }
/// ```
pub trait Object: Serialize + DeserializeOwned {
    /// Model name and index declarations for this type
    fn schema() -> Schema;

    /// Unique identity; must not change across updates
    fn primary_key(&self) -> PrimaryKey;

    /// Indexed values currently held by this object.
    ///
    /// Zero-valued fields are omitted, which is what makes a partially
    /// populated value usable as a filter template.
    fn secondary_keys(&self) -> Vec<SecondaryKey>;

    /// Encode for storage.
    ///
    /// Override to persist an alternate wire representation.
    fn encode<C: Codec>(&self, codec: &C) -> Result<Vec<u8>> {
        Ok(codec.encode(self)?)
    }

    /// Decode from storage; must mirror [`Object::encode`]
    fn decode<C: Codec>(codec: &C, bytes: &[u8]) -> Result<Self> {
        Ok(codec.decode(bytes)?)
    }
}

/// One declared secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    /// Index (field) name, used in logs and errors
    pub name: String,
    /// Index partition prefix
    pub prefix: u8,
}

/// Model name and index declarations of an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    model: String,
    indexes: Vec<IndexDef>,
}

impl Schema {
    /// Start a schema for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Schema {
            model: model.into(),
            indexes: Vec::new(),
        }
    }

    /// Declare a secondary index
    pub fn index(mut self, name: impl Into<String>, prefix: u8) -> Self {
        self.indexes.push(IndexDef {
            name: name.into(),
            prefix,
        });
        self
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Declared indexes, in declaration order
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    /// Look up the index declared for `prefix`
    pub fn index_for(&self, prefix: u8) -> Option<&IndexDef> {
        self.indexes.iter().find(|idx| idx.prefix == prefix)
    }

    /// Check the declarations.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid model name, an index on
    /// the reserved primary partition, or a duplicated prefix or name.
    pub fn validate(&self) -> Result<()> {
        validate_name("model", &self.model)?;

        let mut prefixes = HashSet::new();
        let mut names = HashSet::new();
        for idx in &self.indexes {
            if idx.prefix == PRIMARY_PARTITION {
                return Err(Error::config(format!(
                    "index '{}' on model '{}' uses reserved prefix {:#04x}",
                    idx.name, self.model, PRIMARY_PARTITION
                )));
            }
            if idx.name.is_empty() {
                return Err(Error::config(format!(
                    "index with prefix {:#04x} on model '{}' has no name",
                    idx.prefix, self.model
                )));
            }
            if !prefixes.insert(idx.prefix) {
                return Err(Error::config(format!(
                    "prefix {:#04x} declared twice on model '{}'",
                    idx.prefix, self.model
                )));
            }
            if !names.insert(idx.name.as_str()) {
                return Err(Error::config(format!(
                    "index name '{}' declared twice on model '{}'",
                    idx.name, self.model
                )));
            }
        }
        Ok(())
    }
}

/// Validate a key-space name: non-empty, `[a-z0-9_]` only.
///
/// The restricted alphabet keeps bucket prefixes from nesting inside each
/// other.
pub fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::config(format!("{} name must not be empty", what)));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
    {
        return Err(Error::config(format!(
            "{} name '{}' contains invalid character {:?}",
            what, name, c
        )));
    }
    Ok(())
}
