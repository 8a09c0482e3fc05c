//! KeySet: candidate primary-key sets and their intersection
//!
//! One `KeySet` is materialized per filter predicate. Membership uses
//! `FxHashSet` over the raw key bytes: keys come from our own index, so a
//! fast non-cryptographic hash is enough.

use rustc_hash::FxHashSet;
use weft_core::PrimaryKey;

/// Unordered set of primary keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: FxHashSet<PrimaryKey>,
}

impl KeySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key; returns false if it was already present
    pub fn insert(&mut self, key: PrimaryKey) -> bool {
        self.keys.insert(key)
    }

    /// Membership test
    pub fn contains(&self, key: &PrimaryKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &PrimaryKey> {
        self.keys.iter()
    }

    /// Members in ascending byte order
    pub fn into_sorted_vec(self) -> Vec<PrimaryKey> {
        let mut keys: Vec<PrimaryKey> = self.keys.into_iter().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<PrimaryKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = PrimaryKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl Extend<PrimaryKey> for KeySet {
    fn extend<I: IntoIterator<Item = PrimaryKey>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

/// Intersect candidate sets, pivoting on the smallest.
///
/// - no sets: empty
/// - one set: its members
/// - otherwise: every member of the smallest set present in all others
///
/// Work is bounded by the size of the smallest set. The result order is
/// unspecified; callers sort it.
pub fn intersect(sets: &[KeySet]) -> Vec<PrimaryKey> {
    let pivot = match sets.iter().enumerate().min_by_key(|(_, s)| s.len()) {
        Some((i, _)) => i,
        None => return Vec::new(),
    };
    if sets[pivot].is_empty() {
        return Vec::new();
    }

    sets[pivot]
        .iter()
        .filter(|key| {
            sets.iter()
                .enumerate()
                .all(|(i, other)| i == pivot || other.contains(key))
        })
        .cloned()
        .collect()
}
