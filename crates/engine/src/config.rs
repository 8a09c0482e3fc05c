//! Store configuration
//!
//! The host decides where configuration comes from; the store only needs a
//! deserializable value. Every field has a default, so an empty document is
//! a valid configuration.
//!
//! # Example
//!
//! ```json
//! { "codec": "json", "namespace": "tenant1", "verify_index_on_update": true }
//! ```

use serde::{Deserialize, Serialize};
use weft_core::{validate_name, Result};
use weft_storage::codec::{get_codec, AnyCodec};

/// Default codec identifier
pub const DEFAULT_CODEC: &str = "bincode";

/// Configuration for one [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Codec identifier: `"bincode"` or `"json"`
    pub codec: String,
    /// Optional key-space prefix shared by every bucket of the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Cross-check the stored index list against the old object on update
    pub verify_index_on_update: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_CODEC.to_string(),
            namespace: None,
            verify_index_on_update: true,
        }
    }
}

impl StoreConfig {
    /// Use the codec named `codec_id`
    pub fn with_codec(mut self, codec_id: impl Into<String>) -> Self {
        self.codec = codec_id.into();
        self
    }

    /// Place every bucket under `namespace`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Enable or disable the update cross-check
    pub fn verify_index_on_update(mut self, verify: bool) -> Self {
        self.verify_index_on_update = verify;
        self
    }

    /// Resolve the configured codec.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown codec identifier.
    pub fn codec(&self) -> Result<AnyCodec> {
        Ok(get_codec(&self.codec)?)
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown codec or an invalid
    /// namespace name.
    pub fn validate(&self) -> Result<()> {
        self.codec()?;
        if let Some(ns) = &self.namespace {
            validate_name("namespace", ns)?;
        }
        Ok(())
    }
}
