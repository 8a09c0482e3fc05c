//! Indexed object store engine for weft
//!
//! This crate composes the lower layers into the object store:
//! - ObjectStore: primary key -> encoded object
//! - IndexStore: secondary-key pointers and per-object index lists
//! - Inspector: derives and checks an object's keys
//! - KeySet: candidate primary-key sets and their intersection
//! - Cursor: sorted, resumable result of a multi-predicate filter
//! - Store: the Create/Read/Update/Delete/Filter/IterateKeys façade
//!
//! # Consistency
//!
//! Between any two complete operations, for every object with primary key
//! `P`, the index list for `P` equals the secondary keys the object reports,
//! and a pointer exists for exactly those `(key, P)` pairs. Every mutation
//! touches all three partitions or fails with a fatal error, after which the
//! host must abort its state transition.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod filter;
pub mod index;
pub mod inspector;
pub mod keyset;
pub mod object_store;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::StoreConfig;
pub use filter::Cursor;
pub use index::IndexStore;
pub use inspector::{Inspector, ObjectKeys};
pub use keyset::{intersect, KeySet};
pub use object_store::ObjectStore;
pub use store::Store;

use weft_core::Error;

/// Build an invariant violation, logging it where it is detected
pub(crate) fn invariant_violation(msg: impl Into<String>) -> Error {
    let msg = msg.into();
    tracing::error!(target: "weft::invariant", error = %msg, "Invariant violated");
    Error::InvariantViolation(msg)
}
