//! Binary codec (default), backed by bincode.

use serde::de::DeserializeOwned;
use serde::Serialize;
use weft_core::{Codec, CodecError};

/// Compact binary codec backed by `bincode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn codec_id(&self) -> &str {
        "bincode"
    }
}
