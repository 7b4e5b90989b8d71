use bep44_types::Target;

use crate::error::StoreResult;
use crate::item::StoredItem;

/// Persistence backend for stored items, keyed by [`Target`].
///
/// Implementations must satisfy these invariants:
/// - `put` replaces whatever is stored at the item's target, atomically.
/// - `get` observes the most recent successful `put`.
/// - `get` on an absent target returns [`StoreError::ItemNotFound`].
/// - The store never validates items. Sequence, CAS, and expiry rules are
///   enforced by the [`Wrapper`](crate::Wrapper).
///
/// [`StoreError::ItemNotFound`]: crate::StoreError::ItemNotFound
pub trait Store: Send + Sync {
    /// Store `item` at its target, replacing any existing record.
    fn put(&self, item: StoredItem) -> StoreResult<()>;

    /// Read the record at `target`.
    fn get(&self, target: &Target) -> StoreResult<StoredItem>;

    /// Remove the record at `target`. Removing an absent target is not an
    /// error.
    fn del(&self, target: &Target) -> StoreResult<()>;

    /// List every stored target.
    ///
    /// Only used by [`Wrapper::purge_expired`](crate::Wrapper::purge_expired).
    /// Backends that cannot enumerate keep the default, which makes the sweep
    /// a no-op and leaves expiry to reads.
    fn targets(&self) -> StoreResult<Vec<Target>> {
        Ok(Vec::new())
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn put(&self, item: StoredItem) -> StoreResult<()> {
        (**self).put(item)
    }

    fn get(&self, target: &Target) -> StoreResult<StoredItem> {
        (**self).get(target)
    }

    fn del(&self, target: &Target) -> StoreResult<()> {
        (**self).del(target)
    }

    fn targets(&self) -> StoreResult<Vec<Target>> {
        (**self).targets()
    }
}
