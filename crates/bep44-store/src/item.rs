use std::time::SystemTime;

use bep44_crypto::{sign, Signature, SigningKey};
use bep44_types::{Target, Value, PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// A data item as validated and stored.
///
/// Mutability is carried by the variant: only [`Item::Mutable`] has an owner
/// key, salt, sequence number, CAS token, and signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// Addressed by the hash of its value. Never updated, only replaced by an
    /// identical copy.
    Immutable(Value),
    /// Addressed by the owner key and salt, updatable under Seq/CAS rules.
    Mutable(MutableItem),
}

/// The signed fields of a mutable item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutableItem {
    pub value: Value,
    /// Owner's Ed25519 public key.
    pub key: [u8; PUBLIC_KEY_LEN],
    pub salt: Vec<u8>,
    pub seq: i64,
    /// Expected previous token; `0` means the writer did not ask for CAS.
    pub cas: i64,
    pub sig: Signature,
}

impl Item {
    /// An immutable item holding `value`.
    pub fn immutable(value: impl Into<Value>) -> Self {
        Self::Immutable(value.into())
    }

    /// A mutable item owned by `key`, signed over `(salt, seq, value)`.
    pub fn new_mutable(
        value: impl Into<Value>,
        salt: impl Into<Vec<u8>>,
        seq: i64,
        cas: i64,
        key: &SigningKey,
    ) -> Self {
        let value = value.into();
        let salt = salt.into();
        let sig = sign(key, &salt, seq, &value.encode());
        Self::Mutable(MutableItem {
            value,
            key: key.verifying_key().as_bytes(),
            salt,
            seq,
            cas,
            sig,
        })
    }

    /// Replace the value of a mutable item, bump its sequence number, and
    /// re-sign it. Returns `false` (and changes nothing) for immutable items
    /// and for items already at `i64::MAX`.
    pub fn modify(&mut self, value: impl Into<Value>, key: &SigningKey) -> bool {
        let Self::Mutable(item) = self else {
            return false;
        };
        let Some(next) = item.seq.checked_add(1) else {
            return false;
        };
        item.value = value.into();
        item.seq = next;
        item.sig = sign(key, &item.salt, item.seq, &item.value.encode());
        true
    }

    /// Where this item is stored.
    pub fn target(&self) -> Target {
        match self {
            Self::Immutable(value) => Target::immutable(value),
            Self::Mutable(item) => Target::mutable(&item.key, &item.salt),
        }
    }

    /// Canonical bencoding of the value.
    pub fn encoded_value(&self) -> Vec<u8> {
        self.value().encode()
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Immutable(value) => value,
            Self::Mutable(item) => &item.value,
        }
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Mutable(_))
    }

    pub fn key(&self) -> Option<&[u8; PUBLIC_KEY_LEN]> {
        match self {
            Self::Immutable(_) => None,
            Self::Mutable(item) => Some(&item.key),
        }
    }

    /// Salt; empty for immutable items.
    pub fn salt(&self) -> &[u8] {
        match self {
            Self::Immutable(_) => &[],
            Self::Mutable(item) => &item.salt,
        }
    }

    /// Sequence number; `0` for immutable items.
    pub fn seq(&self) -> i64 {
        match self {
            Self::Immutable(_) => 0,
            Self::Mutable(item) => item.seq,
        }
    }

    /// CAS token; `0` for immutable items.
    pub fn cas(&self) -> i64 {
        match self {
            Self::Immutable(_) => 0,
            Self::Mutable(item) => item.cas,
        }
    }

    pub fn sig(&self) -> Option<&Signature> {
        match self {
            Self::Immutable(_) => None,
            Self::Mutable(item) => Some(&item.sig),
        }
    }

    /// Flatten into the caller-facing form.
    pub fn to_put(&self) -> Put {
        self.clone().into()
    }
}

/// Caller-facing flat form of an item, as carried in `put` arguments.
///
/// `key: None` means immutable; the remaining mutable fields are then
/// ignored on conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Put {
    pub value: Value,
    pub key: Option<[u8; PUBLIC_KEY_LEN]>,
    pub salt: Vec<u8>,
    pub sig: [u8; SIGNATURE_LEN],
    pub cas: i64,
    pub seq: i64,
}

impl Put {
    /// An immutable put.
    pub fn immutable(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            key: None,
            salt: Vec::new(),
            sig: [0u8; SIGNATURE_LEN],
            cas: 0,
            seq: 0,
        }
    }

    /// An unsigned mutable put. Call [`Put::sign`] before submitting it.
    pub fn mutable(
        value: impl Into<Value>,
        key: [u8; PUBLIC_KEY_LEN],
        salt: impl Into<Vec<u8>>,
        seq: i64,
        cas: i64,
    ) -> Self {
        Self {
            value: value.into(),
            key: Some(key),
            salt: salt.into(),
            sig: [0u8; SIGNATURE_LEN],
            cas,
            seq,
        }
    }

    /// Fill in `sig` for the current salt, seq, and value.
    pub fn sign(&mut self, key: &SigningKey) {
        self.sig = sign(key, &self.salt, self.seq, &self.value.encode()).to_bytes();
    }

    pub fn target(&self) -> Target {
        match &self.key {
            Some(key) => Target::mutable(key, &self.salt),
            None => Target::immutable(&self.value),
        }
    }

    pub fn to_item(&self) -> Item {
        self.clone().into()
    }
}

impl From<Put> for Item {
    fn from(put: Put) -> Self {
        match put.key {
            None => Item::Immutable(put.value),
            Some(key) => Item::Mutable(MutableItem {
                value: put.value,
                key,
                salt: put.salt,
                seq: put.seq,
                cas: put.cas,
                sig: Signature::from_bytes(put.sig),
            }),
        }
    }
}

impl From<Item> for Put {
    fn from(item: Item) -> Self {
        match item {
            Item::Immutable(value) => Put::immutable(value),
            Item::Mutable(item) => Put {
                value: item.value,
                key: Some(item.key),
                salt: item.salt,
                sig: item.sig.to_bytes(),
                cas: item.cas,
                seq: item.seq,
            },
        }
    }
}

/// An item together with the server-assigned time it was last accepted.
///
/// Only the [`Wrapper`](crate::Wrapper) stamps `created`; backends persist
/// and return it unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredItem {
    item: Item,
    created: SystemTime,
}

impl StoredItem {
    pub fn new(item: Item, created: SystemTime) -> Self {
        Self { item, created }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn created(&self) -> SystemTime {
        self.created
    }

    pub fn target(&self) -> Target {
        self.item.target()
    }

    pub fn into_item(self) -> Item {
        self.item
    }
}
