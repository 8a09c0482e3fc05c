//! Account registry scenarios
//!
//! Accounts are keyed by `domain*name` and indexed by owner and by domain,
//! the way a name registry layers its business rules on the store.

use serde::{Deserialize, Serialize};
use weft::{MemKv, Object, PrimaryKey, Schema, SecondaryKey, Store, Transaction};

const OWNER: u8 = 1;
const DOMAIN: u8 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Account {
    domain: String,
    name: String,
    owner: String,
    targets: Vec<String>,
}

impl Account {
    fn new(domain: &str, name: &str, owner: &str) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            owner: owner.into(),
            targets: Vec::new(),
        }
    }

    fn owned_by(owner: &str) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }

    fn in_domain(domain: &str) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }
}

impl Object for Account {
    fn schema() -> Schema {
        Schema::new("account")
            .index("owner", OWNER)
            .index("domain", DOMAIN)
    }

    fn primary_key(&self) -> PrimaryKey {
        if self.domain.is_empty() || self.name.is_empty() {
            return PrimaryKey::new(Vec::new());
        }
        PrimaryKey::composite([&self.domain, &self.name], b'*')
    }

    fn secondary_keys(&self) -> Vec<SecondaryKey> {
        [
            SecondaryKey::from_field(OWNER, &self.owner),
            SecondaryKey::from_field(DOMAIN, &self.domain),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Minimal object for the canonical two-record scenario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Tagged {
    pk: String,
    owner: String,
}

impl Object for Tagged {
    fn schema() -> Schema {
        Schema::new("tagged").index("owner", OWNER)
    }

    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from(self.pk.as_str())
    }

    fn secondary_keys(&self) -> Vec<SecondaryKey> {
        SecondaryKey::from_field(OWNER, &self.owner)
            .into_iter()
            .collect()
    }
}

fn tagged(pk: &str, owner: &str) -> Tagged {
    Tagged {
        pk: pk.into(),
        owner: owner.into(),
    }
}

fn owner(owner: &str) -> Tagged {
    tagged("", owner)
}

fn names(keys: Vec<PrimaryKey>) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn two_records_one_owner() {
    crate::init_tracing();
    let store = Store::<Tagged>::new().unwrap();
    let mut kv = MemKv::new();
    store.create(&mut kv, &tagged("a", "alice")).unwrap();
    store.create(&mut kv, &tagged("b", "alice")).unwrap();

    assert_eq!(names(store.filter_keys(&kv, &owner("alice")).unwrap()), ["a", "b"]);
    assert!(store.filter_keys(&kv, &owner("bob")).unwrap().is_empty());

    store.delete(&mut kv, &PrimaryKey::from("a")).unwrap();
    assert_eq!(names(store.filter_keys(&kv, &owner("alice")).unwrap()), ["b"]);
}

#[test]
fn transfer_moves_account_between_owners() {
    crate::init_tracing();
    let store = Store::<Account>::new().unwrap();
    let mut kv = MemKv::new();
    store.create(&mut kv, &Account::new("iov", "alice", "alice-addr")).unwrap();
    store.create(&mut kv, &Account::new("iov", "bob", "bob-addr")).unwrap();

    let pk = PrimaryKey::composite(["iov", "alice"], b'*');
    let mut account = store.read(&kv, &pk).unwrap().unwrap();
    account.owner = "bob-addr".into();
    store.update(&mut kv, &account).unwrap();

    assert!(store
        .filter_keys(&kv, &Account::owned_by("alice-addr"))
        .unwrap()
        .is_empty());
    assert_eq!(
        names(store.filter_keys(&kv, &Account::owned_by("bob-addr")).unwrap()),
        ["iov*alice", "iov*bob"]
    );
}

#[test]
fn deleting_a_domain_through_the_cursor() {
    crate::init_tracing();
    let store = Store::<Account>::new().unwrap();
    let mut kv = MemKv::new();
    for (domain, name) in [("iov", "a"), ("iov", "b"), ("cosmos", "a"), ("iov", "c")] {
        store
            .create(&mut kv, &Account::new(domain, name, "owner"))
            .unwrap();
    }

    let mut txn = Transaction::new(&mut kv);
    {
        let mut cursor = store.filter(&mut txn, &Account::in_domain("iov")).unwrap();
        assert_eq!(cursor.len(), 3);
        while cursor.valid() {
            cursor.delete().unwrap();
            cursor.advance();
        }
    }
    txn.commit().unwrap();

    assert_eq!(store.count(&kv).unwrap(), 1);
    assert_eq!(
        names(store.filter_keys(&kv, &Account::owned_by("owner")).unwrap()),
        ["cosmos*a"]
    );
}

#[test]
fn renewal_updates_unindexed_fields_in_place() {
    crate::init_tracing();
    let store = Store::<Account>::new().unwrap();
    let mut kv = MemKv::new();
    store.create(&mut kv, &Account::new("iov", "a", "o")).unwrap();

    {
        let mut cursor = store.filter(&mut kv, &Account::in_domain("iov")).unwrap();
        let mut account = cursor.read().unwrap();
        account.targets.push("cosmos:addr".into());
        cursor.update(&account).unwrap();
    }

    let pk = PrimaryKey::composite(["iov", "a"], b'*');
    let account = store.read(&kv, &pk).unwrap().unwrap();
    assert_eq!(account.targets, ["cosmos:addr"]);
    assert_eq!(store.secondary_keys(&kv, &pk).unwrap().len(), 2);
}
