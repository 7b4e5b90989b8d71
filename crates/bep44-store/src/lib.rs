//! Validated, expiring storage for BEP44 data items.
//!
//! A storage node accepts small values addressed either by the hash of the
//! value (immutable items) or by an owner's public key and salt (mutable
//! items). Mutable items carry an Ed25519 signature, a sequence number, and
//! an optional CAS token, and every node applies the same rules before
//! replacing one version with the next.
//!
//! # Layers
//!
//! - [`Item`] / [`Put`]: stored and caller-facing item forms
//! - [`check`] / [`check_incoming`]: stateless acceptance rules
//! - [`Store`]: persistence backend trait, with [`MemoryStore`]
//! - [`Wrapper`]: validation, per-target write serialization, and lazy
//!   expiry over any backend; the entry point for the RPC layer
//!
//! # Design Rules
//!
//! 1. A rejected put never changes stored state.
//! 2. Puts for one target are serialized across read, validate, and write.
//! 3. Backends never validate; the wrapper never bypasses validation.
//! 4. Expired items are removed when read (or by an explicit sweep); nothing
//!    runs in the background.

pub mod clock;
pub mod config;
pub mod error;
pub mod item;
pub mod memory;
pub mod traits;
pub mod validation;
pub mod wrapper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, WrapperConfig};
pub use error::{StoreError, StoreResult};
pub use item::{Item, MutableItem, Put, StoredItem};
pub use memory::MemoryStore;
pub use traits::Store;
pub use validation::{check, check_incoming};
pub use wrapper::Wrapper;
