//! Foundation types for BEP44 data items.
//!
//! Every other crate in the workspace depends on `bep44-types`.
//!
//! # Key Types
//!
//! - [`Target`]: 20-byte SHA-1 address of a stored item
//! - [`Value`]: canonical bencode value carried in the `v` field
//! - [`limits`]: protocol-level size limits shared by all peers

pub mod error;
pub mod limits;
pub mod target;
pub mod value;

pub use error::TypeError;
pub use limits::{MAX_SALT_SIZE, MAX_VALUE_SIZE, PUBLIC_KEY_LEN, SIGNATURE_LEN, TARGET_LEN};
pub use target::Target;
pub use value::{write_byte_string, Value};
