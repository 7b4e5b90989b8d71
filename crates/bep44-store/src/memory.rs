use std::collections::HashMap;
use std::sync::RwLock;

use bep44_types::Target;

use crate::error::{StoreError, StoreResult};
use crate::item::StoredItem;
use crate::traits::Store;

/// In-memory, HashMap-based item store.
///
/// All records are held behind a single `RwLock`, taken only for the
/// duration of one map operation. Records are cloned on read.
pub struct MemoryStore {
    items: RwLock<HashMap<Target, StoredItem>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently held, expired or not.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Remove all records.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<Target, StoredItem>>> {
        self.items
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<Target, StoredItem>>> {
        self.items
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn put(&self, item: StoredItem) -> StoreResult<()> {
        let target = item.target();
        self.write()?.insert(target, item);
        Ok(())
    }

    fn get(&self, target: &Target) -> StoreResult<StoredItem> {
        self.read()?
            .get(target)
            .cloned()
            .ok_or(StoreError::ItemNotFound)
    }

    fn del(&self, target: &Target) -> StoreResult<()> {
        self.write()?.remove(target);
        Ok(())
    }

    fn targets(&self) -> StoreResult<Vec<Target>> {
        let mut targets: Vec<Target> = self.read()?.keys().copied().collect();
        targets.sort();
        Ok(targets)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.items.read().map(|m| m.len()).unwrap_or_default();
        f.debug_struct("MemoryStore")
            .field("item_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::item::Item;

    fn stored(value: &str) -> StoredItem {
        StoredItem::new(Item::immutable(value), SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn put_and_get() {
        let store = MemoryStore::new();
        let item = stored("hello");
        let target = item.target();
        store.put(item.clone()).unwrap();
        assert_eq!(store.get(&target).unwrap(), item);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        let target = Target::from_bytes(b"missing");
        assert_eq!(store.get(&target), Err(StoreError::ItemNotFound));
    }

    #[test]
    fn put_overwrites_unconditionally() {
        let store = MemoryStore::new();
        let first = stored("same");
        let later = StoredItem::new(
            Item::immutable("same"),
            SystemTime::UNIX_EPOCH + Duration::from_secs(10),
        );
        store.put(first).unwrap();
        store.put(later.clone()).unwrap();
        assert_eq!(store.get(&later.target()).unwrap(), later);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn del_removes_and_tolerates_absent() {
        let store = MemoryStore::new();
        let item = stored("bye");
        let target = item.target();
        store.put(item).unwrap();
        store.del(&target).unwrap();
        assert_eq!(store.get(&target), Err(StoreError::ItemNotFound));
        store.del(&target).unwrap();
    }

    #[test]
    fn targets_are_sorted() {
        let store = MemoryStore::new();
        for v in ["a", "b", "c"] {
            store.put(stored(v)).unwrap();
        }
        let targets = store.targets().unwrap();
        assert_eq!(targets.len(), 3);
        for w in targets.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn len_is_empty_and_clear() {
        let store = MemoryStore::default();
        assert!(store.is_empty().unwrap());
        store.put(stored("x")).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let item = stored(&format!("value-{i}"));
                    let target = item.target();
                    store.put(item.clone()).unwrap();
                    assert_eq!(store.get(&target).unwrap(), item);
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(store.len().unwrap(), 8);
    }

    #[test]
    fn debug_format() {
        let store = MemoryStore::new();
        store.put(stored("x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("MemoryStore"));
        assert!(debug.contains("item_count: 1"));
    }
}
