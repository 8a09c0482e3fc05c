//! Key model: primary keys, secondary keys and their byte encodings
//!
//! Secondary key values are stored inside prefix-scanned partitions, so the
//! encoding must be prefix-free: no encoded value may be a byte-prefix of
//! another encoded value in the same partition. Every encoded value is
//! terminated by [`SEPARATOR`] and never contains it anywhere else.
//!
//! # Encoding
//!
//! ```text
//! plain:    value-bytes 0x00
//! escaped:  0x01 base64(value-bytes) 0x00
//! ```
//!
//! A value is escaped iff it contains the separator or starts with the
//! escape marker. The base64 alphabet contains neither byte, so decoding
//! never has to guess.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Terminates every encoded secondary key value
pub const SEPARATOR: u8 = 0x00;

/// Leads an escaped (base64) secondary key value
pub const ESCAPE: u8 = 0x01;

/// Index partition reserved for primary records; never valid for a secondary key
pub const PRIMARY_PARTITION: u8 = 0x00;

/// Smallest valid marshaled secondary key: prefix + one content byte + separator
pub const MIN_MARSHALED_LEN: usize = 3;

/// Unique byte identity of a stored object.
///
/// Ordering is plain byte-lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimaryKey(Vec<u8>);

impl PrimaryKey {
    /// Create a primary key from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        PrimaryKey(bytes.into())
    }

    /// Build a composite key from parts joined by `sep`.
    ///
    /// Used for keys such as `domain*account`.
    pub fn composite<I, P>(parts: I, sep: u8) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut bytes = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                bytes.push(sep);
            }
            bytes.extend_from_slice(part.as_ref());
        }
        PrimaryKey(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the key, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether the key has no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for PrimaryKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for PrimaryKey {
    fn from(s: &str) -> Self {
        PrimaryKey(s.as_bytes().to_vec())
    }
}

impl From<String> for PrimaryKey {
    fn from(s: String) -> Self {
        PrimaryKey(s.into_bytes())
    }
}

impl From<Vec<u8>> for PrimaryKey {
    fn from(bytes: Vec<u8>) -> Self {
        PrimaryKey(bytes)
    }
}

impl From<&[u8]> for PrimaryKey {
    fn from(bytes: &[u8]) -> Self {
        PrimaryKey(bytes.to_vec())
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Indexed attribute value, partitioned by a one-byte index prefix.
///
/// The value is held in its encoded (escaped, separator-terminated) form.
/// Field order matters: the derived ordering equals the byte order of the
/// marshaled form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecondaryKey {
    prefix: u8,
    encoded: Vec<u8>,
}

impl SecondaryKey {
    /// Create a secondary key, escaping the value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `prefix` is the reserved primary
    /// partition or the value is empty.
    pub fn new(prefix: u8, value: impl AsRef<[u8]>) -> Result<Self> {
        if prefix == PRIMARY_PARTITION {
            return Err(Error::config(format!(
                "secondary key prefix {:#04x} is reserved for primary records",
                prefix
            )));
        }
        let value = value.as_ref();
        if value.is_empty() {
            return Err(Error::config("secondary key value must not be empty"));
        }
        Ok(Self::encoded_unchecked(prefix, value))
    }

    /// Key for an object field; `None` when the field holds its zero value.
    ///
    /// Zero-valued fields are not key material: they are never indexed and
    /// contribute no predicate to a filter template.
    pub fn from_field<F: crate::object::KeyMaterial + ?Sized>(prefix: u8, field: &F) -> Option<Self> {
        let value = field.key_bytes();
        if value.is_empty() {
            None
        } else {
            Some(Self::encoded_unchecked(prefix, value))
        }
    }

    fn encoded_unchecked(prefix: u8, value: &[u8]) -> Self {
        SecondaryKey {
            prefix,
            encoded: encode_value(value),
        }
    }

    /// Index partition
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Encoded value including the trailing separator
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Original (unescaped) value bytes
    pub fn value(&self) -> Result<Vec<u8>> {
        decode_value(&self.encoded)
    }

    /// Marshal to `prefix || encoded-value`
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.encoded.len());
        out.push(self.prefix);
        out.extend_from_slice(&self.encoded);
        out
    }

    /// Parse a marshaled secondary key.
    ///
    /// # Errors
    ///
    /// Marshaled keys only ever come from the index list, so any malformed
    /// input is an invariant violation.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_MARSHALED_LEN {
            return Err(Error::invariant(format!(
                "marshaled secondary key must be at least {} bytes, got {}",
                MIN_MARSHALED_LEN,
                bytes.len()
            )));
        }
        let encoded = &bytes[1..];
        let (last, body) = encoded
            .split_last()
            .ok_or_else(|| Error::invariant("marshaled secondary key has no value"))?;
        if *last != SEPARATOR || body.contains(&SEPARATOR) {
            return Err(Error::invariant(
                "marshaled secondary key is not separator-terminated",
            ));
        }
        Ok(SecondaryKey {
            prefix: bytes[0],
            encoded: encoded.to_vec(),
        })
    }
}

impl fmt::Display for SecondaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = &self.encoded[..self.encoded.len().saturating_sub(1)];
        write!(f, "{:#04x}:{}", self.prefix, String::from_utf8_lossy(body))
    }
}

/// Whether a raw value needs the base64 escape
fn needs_escape(value: &[u8]) -> bool {
    value.first() == Some(&ESCAPE) || value.contains(&SEPARATOR)
}

/// Encode a raw value into its prefix-free form
pub fn encode_value(value: &[u8]) -> Vec<u8> {
    if needs_escape(value) {
        let b64 = STANDARD.encode(value);
        let mut out = Vec::with_capacity(b64.len() + 2);
        out.push(ESCAPE);
        out.extend_from_slice(b64.as_bytes());
        out.push(SEPARATOR);
        out
    } else {
        let mut out = Vec::with_capacity(value.len() + 1);
        out.extend_from_slice(value);
        out.push(SEPARATOR);
        out
    }
}

/// Decode a value produced by [`encode_value`]
pub fn decode_value(encoded: &[u8]) -> Result<Vec<u8>> {
    let body = match encoded.split_last() {
        Some((&SEPARATOR, body)) => body,
        _ => return Err(Error::invariant("encoded key value is not separator-terminated")),
    };
    match body.split_first() {
        Some((&ESCAPE, b64)) => STANDARD
            .decode(b64)
            .map_err(|e| Error::invariant(format!("invalid escaped key value: {}", e))),
        _ => Ok(body.to_vec()),
    }
}
