//! Storage layer for weft
//!
//! This crate implements the pieces that sit between the engine and the
//! host's ordered byte store:
//! - MemKv: BTreeMap-backed `KvStore` with cursor accounting
//! - Transaction: buffered write overlay with commit/rollback, standing in
//!   for the host's state-transition boundary
//! - Bucket: per-model key-space layout (objects, index pointers, index lists)
//! - Codecs: bincode (default) and JSON object codecs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bucket;
pub mod codec;
pub mod memory;
pub mod txn;

pub use bucket::{Bucket, BucketKind};
pub use codec::{get_codec, AnyCodec, BincodeCodec, JsonCodec};
pub use memory::MemKv;
pub use txn::Transaction;
