//! Bucket: per-model key-space layout
//!
//! Every model owns three disjoint key spaces in the host store:
//!
//! ```text
//! [<namespace> ":"] <model> "/o" <primary-key>                      -> object bytes
//! [<namespace> ":"] <model> "/i" <prefix> <value> 0x00 <primary-key> -> (empty)
//! [<namespace> ":"] <model> "/l" <primary-key>                      -> index list
//! ```
//!
//! Names are restricted to `[a-z0-9_]` and the namespace delimiter differs
//! from the model delimiter, so the first delimiter of a prefix tells a
//! namespaced bucket from a plain one and no bucket prefix is a prefix of
//! another bucket's keys.

use weft_core::{prefix_end, validate_name, KvCursor, KvStore, Result};

/// Ends the namespace part of a bucket prefix
pub const NAMESPACE_DELIMITER: u8 = b':';

/// Ends the model part of a bucket prefix
pub const MODEL_DELIMITER: u8 = b'/';

/// Which of a model's key spaces a bucket addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    /// Primary records
    Objects,
    /// Secondary-key -> primary-key pointers
    IndexPointers,
    /// Primary-key -> indexed secondary keys
    IndexLists,
}

impl BucketKind {
    /// Tag byte appended after the model name
    pub fn tag(&self) -> u8 {
        match self {
            BucketKind::Objects => b'o',
            BucketKind::IndexPointers => b'i',
            BucketKind::IndexLists => b'l',
        }
    }
}

/// A prefix-isolated key space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    prefix: Vec<u8>,
}

impl Bucket {
    /// Bucket for `model` (optionally under `namespace`)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a name is empty or uses characters
    /// outside `[a-z0-9_]`.
    pub fn new(namespace: Option<&str>, model: &str, kind: BucketKind) -> Result<Self> {
        let mut prefix = Vec::new();
        if let Some(ns) = namespace {
            validate_name("namespace", ns)?;
            prefix.extend_from_slice(ns.as_bytes());
            prefix.push(NAMESPACE_DELIMITER);
        }
        validate_name("model", model)?;
        prefix.extend_from_slice(model.as_bytes());
        prefix.push(MODEL_DELIMITER);
        prefix.push(kind.tag());
        Ok(Self { prefix })
    }

    /// Bucket prefix bytes
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Full store key for `suffix`
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.prefix.len() + suffix.len());
        key.extend_from_slice(&self.prefix);
        key.extend_from_slice(suffix);
        key
    }

    /// Full store key for the concatenation of `parts`
    pub fn key_from_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        let len = self.prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
        let mut key = Vec::with_capacity(len);
        key.extend_from_slice(&self.prefix);
        for part in parts {
            key.extend_from_slice(part);
        }
        key
    }

    /// Strip the bucket prefix; `None` if `key` is outside the bucket
    pub fn strip<'k>(&self, key: &'k [u8]) -> Option<&'k [u8]> {
        key.strip_prefix(self.prefix.as_slice())
    }

    /// Open a cursor over every key in this bucket that starts with `sub_prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying cursor cannot be opened.
    pub fn scan<'s, S: KvStore + ?Sized>(
        &self,
        kv: &'s S,
        sub_prefix: &[u8],
    ) -> Result<KvCursor<'s>> {
        let start = self.key(sub_prefix);
        let end = prefix_end(&start);
        kv.iterate(&start, end.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemKv;

    #[test]
    fn test_layout() {
        let b = Bucket::new(None, "account", BucketKind::Objects).unwrap();
        assert_eq!(b.prefix(), b"account/o");
        assert_eq!(b.key(b"alice"), b"account/oalice");
        assert_eq!(b.strip(b"account/oalice"), Some(&b"alice"[..]));
        assert_eq!(b.strip(b"domain/oalice"), None);
    }

    #[test]
    fn test_namespace_layout() {
        let b = Bucket::new(Some("tenant1"), "account", BucketKind::IndexLists).unwrap();
        assert_eq!(b.prefix(), b"tenant1:account/l");
    }

    #[test]
    fn test_namespaced_and_plain_buckets_do_not_nest() {
        let kinds = [BucketKind::Objects, BucketKind::IndexPointers, BucketKind::IndexLists];
        let mut buckets = Vec::new();
        for kind in kinds {
            buckets.push(Bucket::new(None, "acct", kind).unwrap());
            buckets.push(Bucket::new(None, "orders", kind).unwrap());
            buckets.push(Bucket::new(Some("acct"), "orders", kind).unwrap());
            buckets.push(Bucket::new(Some("acct"), "lists", kind).unwrap());
            buckets.push(Bucket::new(Some("orders"), "acct", kind).unwrap());
        }
        for a in &buckets {
            for b in &buckets {
                if a != b {
                    assert!(
                        !b.prefix().starts_with(a.prefix()),
                        "{:?} nests inside {:?}",
                        String::from_utf8_lossy(a.prefix()),
                        String::from_utf8_lossy(b.prefix())
                    );
                }
            }
        }
    }

    #[test]
    fn test_scan_skips_namespaced_model_with_overlapping_name() {
        let mut kv = MemKv::new();
        let plain = Bucket::new(None, "acct", BucketKind::Objects).unwrap();
        let nested = Bucket::new(Some("acct"), "orders", BucketKind::Objects).unwrap();
        let nested_lists = Bucket::new(Some("acct"), "orders", BucketKind::IndexLists).unwrap();
        kv.set(&nested.key(b"o1"), b"").unwrap();
        kv.set(&nested_lists.key(b"o1"), b"").unwrap();

        assert_eq!(plain.scan(&kv, b"").unwrap().count(), 0);
        assert_eq!(nested.scan(&kv, b"").unwrap().count(), 1);
        assert_eq!(kv.open_cursors(), 0);
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(Bucket::new(None, "", BucketKind::Objects).is_err());
        assert!(Bucket::new(None, "a/b", BucketKind::Objects).is_err());
        assert!(Bucket::new(Some("NS"), "a", BucketKind::Objects).is_err());
    }

    #[test]
    fn test_key_from_parts() {
        let b = Bucket::new(None, "m", BucketKind::IndexPointers).unwrap();
        assert_eq!(b.key_from_parts(&[&b"\x01"[..], &b"v\0"[..], &b"pk"[..]]), b"m/i\x01v\0pk");
    }

    #[test]
    fn test_scan_stays_inside_bucket() {
        let mut kv = MemKv::new();
        let objects = Bucket::new(None, "acct", BucketKind::Objects).unwrap();
        let lists = Bucket::new(None, "acct", BucketKind::IndexLists).unwrap();
        let other = Bucket::new(None, "acct2", BucketKind::Objects).unwrap();
        kv.set(&objects.key(b"a"), b"").unwrap();
        kv.set(&objects.key(b"b"), b"").unwrap();
        kv.set(&lists.key(b"a"), b"").unwrap();
        kv.set(&other.key(b"a"), b"").unwrap();

        let keys: Vec<Vec<u8>> = objects
            .scan(&kv, b"")
            .unwrap()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![objects.key(b"a"), objects.key(b"b")]);
        assert_eq!(kv.open_cursors(), 0);
    }
}
