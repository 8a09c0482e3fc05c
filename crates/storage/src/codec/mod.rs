//! Object codecs.
//!
//! The store never inspects object content; it hands values to a codec and
//! persists the bytes. Codecs are injected, never looked up from global state.
//!
//! - `BincodeCodec`: compact binary encoding (default)
//! - `JsonCodec`: human-readable encoding, handy when inspecting a store
//! - `AnyCodec`: runtime choice between the two, selected by identifier
//!
//! # Usage
//!
//! ```ignore
//! use weft_core::Codec;
//! use weft_storage::codec::get_codec;
//!
//! let codec = get_codec("bincode")?;
//! let bytes = codec.encode(&vec![1u32, 2, 3])?;
//! let back: Vec<u32> = codec.decode(&bytes)?;
//! ```

mod binary;
mod json;

pub use binary::BincodeCodec;
pub use json::JsonCodec;

use serde::de::DeserializeOwned;
use serde::Serialize;
use weft_core::{Codec, CodecError};

/// Codec chosen at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyCodec {
    /// Binary encoding
    Bincode(BincodeCodec),
    /// JSON encoding
    Json(JsonCodec),
}

impl Default for AnyCodec {
    fn default() -> Self {
        AnyCodec::Bincode(BincodeCodec)
    }
}

impl Codec for AnyCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            AnyCodec::Bincode(c) => c.encode(value),
            AnyCodec::Json(c) => c.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            AnyCodec::Bincode(c) => c.decode(bytes),
            AnyCodec::Json(c) => c.decode(bytes),
        }
    }

    fn codec_id(&self) -> &str {
        match self {
            AnyCodec::Bincode(c) => c.codec_id(),
            AnyCodec::Json(c) => c.codec_id(),
        }
    }
}

/// Resolve the codec named in a store configuration.
///
/// `"bincode"` selects the compact binary format, `"json"` the readable one.
/// Any other name is `CodecError::UnknownCodec` carrying that name.
pub fn get_codec(codec_id: &str) -> Result<AnyCodec, CodecError> {
    match codec_id {
        "bincode" => Ok(AnyCodec::Bincode(BincodeCodec)),
        "json" => Ok(AnyCodec::Json(JsonCodec)),
        _ => Err(CodecError::UnknownCodec(codec_id.to_string())),
    }
}
