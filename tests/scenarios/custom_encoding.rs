//! Objects that persist an alternate wire representation

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use weft::{
    Codec, Error, JsonCodec, KvStore, MemKv, Object, PrimaryKey, Result, Schema, SecondaryKey,
    Store, StoreConfig,
};

const ADMIN: u8 = 1;
const WIRE_VERSION: u8 = 1;

/// In memory the tags are a set; on the wire a versioned, sorted list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Domain {
    name: String,
    admin: String,
    tags: BTreeSet<String>,
}

#[derive(Serialize, Deserialize)]
struct DomainWire {
    version: u8,
    name: String,
    admin: String,
    tags: Vec<String>,
}

impl Object for Domain {
    fn schema() -> Schema {
        Schema::new("domain").index("admin", ADMIN)
    }

    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from(self.name.as_str())
    }

    fn secondary_keys(&self) -> Vec<SecondaryKey> {
        SecondaryKey::from_field(ADMIN, &self.admin)
            .into_iter()
            .collect()
    }

    fn encode<C: Codec>(&self, codec: &C) -> Result<Vec<u8>> {
        let wire = DomainWire {
            version: WIRE_VERSION,
            name: self.name.clone(),
            admin: self.admin.clone(),
            tags: self.tags.iter().cloned().collect(),
        };
        Ok(codec.encode(&wire)?)
    }

    fn decode<C: Codec>(codec: &C, bytes: &[u8]) -> Result<Self> {
        let wire: DomainWire = codec.decode(bytes)?;
        if wire.version != WIRE_VERSION {
            return Err(Error::codec(format!("unsupported domain version {}", wire.version)));
        }
        Ok(Domain {
            name: wire.name,
            admin: wire.admin,
            tags: wire.tags.into_iter().collect(),
        })
    }
}

fn domain(name: &str, admin: &str, tags: &[&str]) -> Domain {
    Domain {
        name: name.into(),
        admin: admin.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn custom_wire_format_roundtrips() {
    crate::init_tracing();
    let store: Store<Domain> = Store::new().unwrap();
    let mut kv = MemKv::new();
    let d = domain("iov", "alice", &["b", "a"]);
    store.create(&mut kv, &d).unwrap();
    assert_eq!(store.read(&kv, &PrimaryKey::from("iov")).unwrap(), Some(d));
}

#[test]
fn stored_bytes_use_the_wire_shape() {
    crate::init_tracing();
    let store: Store<Domain, JsonCodec> =
        Store::with_codec(JsonCodec, &StoreConfig::default()).unwrap();
    let mut kv = MemKv::new();
    store
        .create(&mut kv, &domain("iov", "alice", &["z", "m"]))
        .unwrap();

    let raw = kv.get(b"domain/oiov").unwrap().unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(text.contains(r#""version":1"#), "{}", text);
    assert!(text.contains(r#""tags":["m","z"]"#), "{}", text);
}

#[test]
fn unknown_wire_version_is_a_codec_error() {
    crate::init_tracing();
    let store: Store<Domain, JsonCodec> =
        Store::with_codec(JsonCodec, &StoreConfig::default()).unwrap();
    let mut kv = MemKv::new();
    let future = DomainWire {
        version: 9,
        name: "iov".into(),
        admin: "alice".into(),
        tags: Vec::new(),
    };
    kv.set(b"domain/oiov", &JsonCodec.encode(&future).unwrap())
        .unwrap();

    let err = store.read(&kv, &PrimaryKey::from("iov")).unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
}

#[test]
fn update_reads_old_value_through_the_hook() {
    crate::init_tracing();
    let store: Store<Domain> = Store::new().unwrap();
    let mut kv = MemKv::new();
    store.create(&mut kv, &domain("iov", "alice", &[])).unwrap();
    store
        .update(&mut kv, &domain("iov", "bob", &["x"]))
        .unwrap();

    let bob = Domain {
        admin: "bob".into(),
        ..Default::default()
    };
    assert_eq!(store.filter_keys(&kv, &bob).unwrap(), vec![PrimaryKey::from("iov")]);
}
