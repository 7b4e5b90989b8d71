//! Cryptographic primitives for BEP44 items.
//!
//! Provides Ed25519 signing/verification and the canonical byte buffer that
//! mutable items sign. All crypto operations wrap established libraries, no
//! custom cryptography.

pub mod signer;
pub mod signing;

pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
pub use signing::{buffer_to_sign, sign, verify};
