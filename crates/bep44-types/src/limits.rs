//! Protocol constants. These are fixed by the network, not configurable.

/// Maximum length of the bencoded `v` field.
pub const MAX_VALUE_SIZE: usize = 1000;

/// Maximum length of the `salt` field.
pub const MAX_SALT_SIZE: usize = 64;

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of a target (SHA-1 digest).
pub const TARGET_LEN: usize = 20;
