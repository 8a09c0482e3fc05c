//! Shared helpers for the engine integration tests.
//!
//! Import via `mod common;`.

#![allow(dead_code)]

use std::sync::Once;

use serde::{Deserialize, Serialize};
pub use weft_core::{KvStore, Object, PrimaryKey, Schema, SecondaryKey};
pub use weft_engine::{Store, StoreConfig};
pub use weft_storage::{MemKv, Transaction};

pub const OWNER: u8 = 1;
pub const RESOURCE: u8 = 2;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Set `RUST_LOG=weft=trace` to see the engine's logs.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Test objects
// ============================================================================

/// Name record: keyed by name, indexed by owner and by an opaque resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub owner: String,
    pub resource: Vec<u8>,
    pub note: String,
}

impl Record {
    pub fn new(name: &str, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            ..Default::default()
        }
    }

    pub fn with_resource(mut self, resource: &[u8]) -> Self {
        self.resource = resource.to_vec();
        self
    }

    pub fn by_owner(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            ..Default::default()
        }
    }

    pub fn by_resource(resource: &[u8]) -> Self {
        Self {
            resource: resource.to_vec(),
            ..Default::default()
        }
    }
}

impl Object for Record {
    fn schema() -> Schema {
        Schema::new("record")
            .index("owner", OWNER)
            .index("resource", RESOURCE)
    }

    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from(self.name.as_str())
    }

    fn secondary_keys(&self) -> Vec<SecondaryKey> {
        [
            SecondaryKey::from_field(OWNER, &self.owner),
            SecondaryKey::from_field(RESOURCE, &self.resource),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn store() -> Store<Record> {
    init_tracing();
    Store::new().unwrap()
}

pub fn pks(keys: &[&str]) -> Vec<PrimaryKey> {
    keys.iter().map(|k| PrimaryKey::from(*k)).collect()
}

/// Check the object/index agreement for every stored record by brute force
pub fn assert_consistent(store: &Store<Record>, kv: &MemKv) {
    let mut keys = Vec::new();
    store
        .iterate_keys(kv, |pk| {
            keys.push(pk.clone());
            true
        })
        .unwrap();

    let mut pointers = 0;
    for pk in &keys {
        let record = store.read(kv, pk).unwrap().unwrap();
        let mut expected = record.secondary_keys();
        expected.sort();
        expected.dedup();
        assert_eq!(store.secondary_keys(kv, pk).unwrap(), expected, "list of {}", pk);
        for sk in &expected {
            let mut found = false;
            store
                .iterate_index(kv, sk, |holder| {
                    found |= holder == pk;
                    !found
                })
                .unwrap();
            assert!(found, "missing pointer {} -> {}", sk, pk);
        }
        pointers += expected.len();
    }

    // objects + lists + pointers is everything in the store
    assert_eq!(kv.len(), keys.len() * 2 + pointers);
    assert_eq!(kv.open_cursors(), 0);
}
