//! Stateless acceptance rules for incoming items.
//!
//! [`check`] decides whether an item is well-formed on its own.
//! [`check_incoming`] decides whether it may replace the item already stored
//! at the same target. Every storage node applies both identically.

use bep44_crypto::verify;
use bep44_types::{MAX_SALT_SIZE, MAX_VALUE_SIZE};

use crate::error::{StoreError, StoreResult};
use crate::item::Item;

/// Validate size limits and, for mutable items, the signature.
pub fn check(item: &Item) -> StoreResult<()> {
    let encoded = item.encoded_value();
    if encoded.len() > MAX_VALUE_SIZE {
        return Err(StoreError::ValueFieldTooBig);
    }

    let Item::Mutable(item) = item else {
        return Ok(());
    };

    if item.salt.len() > MAX_SALT_SIZE {
        return Err(StoreError::SaltFieldTooBig);
    }
    if !verify(&item.key, &item.salt, item.seq, &encoded, &item.sig) {
        return Err(StoreError::InvalidSignature);
    }
    Ok(())
}

/// Decide whether `incoming` may replace `stored` at the same target.
///
/// An equal sequence number with a byte-identical value is a refresh and is
/// always accepted. Any other write must strictly advance the sequence
/// number, and must echo the stored CAS token if the stored writer set one.
pub fn check_incoming(stored: &Item, incoming: &Item) -> StoreResult<()> {
    if incoming.seq() == stored.seq() && incoming.encoded_value() == stored.encoded_value() {
        return Ok(());
    }
    if stored.seq() >= incoming.seq() {
        return Err(StoreError::SequenceNumberLessThanCurrent);
    }
    if stored.cas() == 0 {
        return Ok(());
    }
    if stored.cas() != incoming.cas() {
        return Err(StoreError::CasHashMismatched);
    }
    Ok(())
}
