//! weft - embedded indexed object store
//!
//! weft keeps typed objects in a host-supplied ordered key-value store and
//! maintains their secondary indexes alongside them, so lookups by any
//! combination of indexed values are a prefix scan and an intersection away.
//!
//! # Quick Start
//!
//! ```ignore
//! use weft::{MemKv, Object, PrimaryKey, Schema, SecondaryKey, Store};
//!
//! let store = Store::<Account>::new()?;
//! let mut kv = MemKv::new();
//!
//! store.create(&mut kv, &account)?;
//! let mine = store.filter_keys(&kv, &Account::by_owner("alice"))?;
//! ```
//!
//! # Architecture
//!
//! - `weft-core`: key model, `Object`/`Schema`, `KvStore` and `Codec` traits, errors
//! - `weft-storage`: in-memory store, transaction overlay, bucket layout, codecs
//! - `weft-engine`: object store, index store, filter cursor and the `Store` façade
//!
//! The host owns the key-value store and the state-transition boundary; a
//! fatal error means the current transition must be discarded.

pub use weft_core::{
    prefix_end, Codec, CodecError, Error, IndexDef, KeyMaterial, KvCursor, KvPair, KvStore, Object,
    PrimaryKey, Result, Schema, SecondaryKey, ESCAPE, PRIMARY_PARTITION, SEPARATOR,
};
pub use weft_engine::{
    intersect, Cursor, IndexStore, Inspector, KeySet, ObjectKeys, ObjectStore, Store, StoreConfig,
};
pub use weft_storage::codec::{get_codec, AnyCodec, BincodeCodec, JsonCodec};
pub use weft_storage::{Bucket, BucketKind, MemKv, Transaction};
