//! Test object types shared by the engine's unit tests

use serde::{Deserialize, Serialize};
use weft_core::{Object, PrimaryKey, Schema, SecondaryKey};

pub const OWNER: u8 = 1;
pub const DOMAIN: u8 = 2;

/// Account keyed by name, indexed by owner and domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub owner: String,
    pub domain: String,
    pub balance: u64,
}

impl Account {
    pub fn new(name: &str, owner: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            domain: domain.to_string(),
            balance: 0,
        }
    }

    /// Filter template matching on owner only
    pub fn by_owner(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            ..Default::default()
        }
    }

    /// Filter template matching on domain only
    pub fn by_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Default::default()
        }
    }
}

impl Object for Account {
    fn schema() -> Schema {
        Schema::new("account").index("owner", OWNER).index("domain", DOMAIN)
    }

    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from(self.name.as_str())
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

pub fn pks(keys: &[&str]) -> Vec<PrimaryKey> {
    keys.iter().map(|k| PrimaryKey::from(*k)).collect()
}
