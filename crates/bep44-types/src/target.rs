use std::fmt;

use sha1::{Digest, Sha1};

use crate::error::TypeError;
use crate::limits::{PUBLIC_KEY_LEN, TARGET_LEN};
use crate::value::Value;

/// Address of a stored item.
///
/// A `Target` is the SHA-1 digest of either the bencoded value (immutable
/// items) or the owner's public key followed by the salt (mutable items).
/// Every peer derives targets the same way, so a divergence here would split
/// the network's view of the same logical item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target([u8; TARGET_LEN]);

impl Target {
    /// Target of an immutable item: `sha1(bencode(value))`.
    pub fn immutable(value: &Value) -> Self {
        Self::from_bytes(&value.encode())
    }

    /// Target of a mutable item: `sha1(public_key ++ salt)`.
    pub fn mutable(public_key: &[u8; PUBLIC_KEY_LEN], salt: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(public_key);
        hasher.update(salt);
        Self::from_digest(&hasher.finalize())
    }

    /// SHA-1 of arbitrary bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_digest(&Sha1::digest(data))
    }

    /// Wrap a pre-computed digest.
    pub const fn from_hash(hash: [u8; TARGET_LEN]) -> Self {
        Self(hash)
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut arr = [0u8; TARGET_LEN];
        arr.copy_from_slice(digest);
        Self(arr)
    }

    /// The raw 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; TARGET_LEN] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != TARGET_LEN {
            return Err(TypeError::InvalidLength {
                expected: TARGET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self::from_digest(&bytes))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.short_hex())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; TARGET_LEN]> for Target {
    fn from(bytes: [u8; TARGET_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Target> for [u8; TARGET_LEN] {
    fn from(target: Target) -> Self {
        target.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VECTOR_KEY: &str = "77ff84905a91936367c01360803104f92432fcd904a43511876df5cdf3e7e548";

    fn vector_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        key.copy_from_slice(&hex::decode(VECTOR_KEY).unwrap());
        key
    }

    #[test]
    fn immutable_target_matches_published_vector() {
        let target = Target::immutable(&Value::from("Hello World!"));
        assert_eq!(target.to_hex(), "e5f96f6f38320f0f33959cb4d3d656452117aadb");
    }

    #[test]
    fn mutable_target_without_salt() {
        let target = Target::mutable(&vector_key(), b"");
        assert_eq!(target.to_hex(), "4a533d47ec9c7d95b1ad75f576cffc641853b750");
    }

    #[test]
    fn mutable_target_with_salt() {
        let target = Target::mutable(&vector_key(), b"foobar");
        assert_eq!(target.to_hex(), "411eba73b6f087ca51a3795d9c8c938d365e32c1");
    }

    #[test]
    fn salt_separates_targets_for_one_key() {
        let key = vector_key();
        assert_ne!(Target::mutable(&key, b"a"), Target::mutable(&key, b"b"));
    }

    #[test]
    fn hex_roundtrip() {
        let target = Target::from_bytes(b"test");
        let parsed = Target::from_hex(&target.to_hex()).unwrap();
        assert_eq!(target, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Target::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Target::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn display_is_full_hex() {
        let target = Target::from_bytes(b"test");
        assert_eq!(format!("{target}").len(), 40);
        assert_eq!(format!("{target:?}"), format!("Target({})", target.short_hex()));
    }

    proptest! {
        #[test]
        fn immutable_target_is_a_function_of_the_encoding(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let value = Value::Bytes(data);
            let first = Target::immutable(&value);
            let second = Target::immutable(&value.clone());
            prop_assert_eq!(first, second);
            prop_assert_eq!(first, Target::from_bytes(&value.encode()));
        }
    }
}
