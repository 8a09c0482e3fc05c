//! Object codec trait definitions.
//!
//! Objects and index lists pass through a codec on their way into and out of
//! the host key-value store. The store receives its codec by injection; there
//! is no process-wide registration.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// Object codec trait.
///
/// Implementations live in `weft-storage`. Decoding malformed input must fail
/// with [`CodecError::Decode`], never panic.
pub trait Codec {
    /// Encode a value to bytes
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode bytes produced by [`Codec::encode`]
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Unique codec identifier
    fn codec_id(&self) -> &str;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Decoding failed (invalid or truncated input)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unknown codec identifier
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::UnknownCodec(_) => Error::Config(e.to_string()),
            _ => Error::Codec(e.to_string()),
        }
    }
}
