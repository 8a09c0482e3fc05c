//! Error types for weft
//!
//! This module defines the error taxonomy shared by every weft crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Error Classes
//!
//! - **Invariant violations** mean the object store, index pointers and
//!   index lists no longer agree (or a caller asked for something that can
//!   only happen after they diverged). The enclosing state transition must be
//!   aborted; retrying is never correct.
//! - **Configuration errors** are reported to whoever builds a schema or a
//!   store. They are not fatal.
//! - **Codec and storage errors** come from the injected collaborators. Once
//!   a mutation has started they leave the three partitions out of step, so
//!   they are fatal as well.
//!
//! Not-found is not an error: reads return `Option`.

use thiserror::Error;

/// Result type alias for weft operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for weft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The object/index invariant is broken or an operation would break it
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Invalid schema or store configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Encoding or decoding failed
    #[error("Codec error: {0}")]
    Codec(String),

    /// The host key-value store reported a failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Create an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        Error::InvariantViolation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Error::Codec(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Whether the enclosing state transition must be aborted.
    ///
    /// Everything except a configuration error is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Config(_))
    }

    /// Whether this is an invariant violation
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::InvariantViolation(_))
    }
}
