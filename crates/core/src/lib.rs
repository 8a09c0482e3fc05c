//! Core types and traits for weft
//!
//! This crate defines the foundational types used throughout the system:
//! - PrimaryKey / SecondaryKey: key model and prefix-free value encoding
//! - Object / Schema / KeyMaterial: what a storable, indexable type provides
//! - KvStore: the ordered byte store supplied by the host state machine
//! - Codec: the injected object <-> bytes serializer
//! - Error: error taxonomy (invariant violation vs configuration error)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod key;
pub mod object;
pub mod traits;

pub use codec::{Codec, CodecError};
pub use error::{Error, Result};
pub use key::{PrimaryKey, SecondaryKey, ESCAPE, PRIMARY_PARTITION, SEPARATOR};
pub use object::{validate_name, IndexDef, KeyMaterial, Object, Schema};
pub use traits::{prefix_end, KvCursor, KvPair, KvStore};
