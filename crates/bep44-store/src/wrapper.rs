use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use bep44_types::Target;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, WrapperConfig};
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, StoredItem};
use crate::traits::Store;
use crate::validation::{check, check_incoming};

/// Validating, expiring front end over any [`Store`].
///
/// This is the entry point the RPC layer calls. `put` runs [`check`], then
/// holds the target's stripe lock across read, [`check_incoming`], and write,
/// so two writers racing on one target can never both validate against the
/// same stored item. Expiry is lazy: an item whose `created + expiry` has
/// passed is deleted by the first read that notices it.
pub struct Wrapper<S> {
    store: S,
    expiry: Duration,
    clock: Arc<dyn Clock>,
    stripes: Box<[Mutex<()>]>,
}

impl<S: Store> Wrapper<S> {
    /// Wrap `store` with the given expiry and default settings otherwise.
    pub fn new(store: S, expiry: Duration) -> Self {
        let stripes = WrapperConfig::default().lock_stripes;
        Self::build(store, expiry, stripes)
    }

    /// Wrap `store` using a validated configuration.
    pub fn from_config(store: S, config: &WrapperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(store, config.expiry(), config.lock_stripes))
    }

    fn build(store: S, expiry: Duration, stripes: usize) -> Self {
        Self {
            store,
            expiry,
            clock: Arc::new(SystemClock),
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Replace the clock used for `created` stamps and expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// The wrapped backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `item` and store it at its target.
    ///
    /// On any error nothing is written and the stored item, if there is one,
    /// is untouched. Expiry is only decided by reads, so an expired record
    /// that nobody has read yet still guards its sequence number and CAS.
    pub fn put(&self, item: Item) -> StoreResult<()> {
        let target = item.target();
        if let Err(e) = check(&item) {
            debug!(target_hex = %target.short_hex(), error = %e, "rejected malformed item");
            return Err(e);
        }

        let _guard = self.lock(&target);
        let now = self.clock.now();
        match self.store.get(&target) {
            Ok(existing) => {
                if let Err(e) = check_incoming(existing.item(), &item) {
                    debug!(
                        target_hex = %target.short_hex(),
                        stored_seq = existing.item().seq(),
                        incoming_seq = item.seq(),
                        error = %e,
                        "rejected item update"
                    );
                    return Err(e);
                }
            }
            Err(StoreError::ItemNotFound) => {}
            Err(e) => return Err(e),
        }

        let seq = item.seq();
        self.store.put(StoredItem::new(item, now))?;
        debug!(target_hex = %target.short_hex(), seq, "stored item");
        Ok(())
    }

    /// Read the item at `target`.
    ///
    /// Returns [`StoreError::ItemNotFound`] if nothing is stored or the stored
    /// item has expired, deleting it in the latter case.
    pub fn get(&self, target: &Target) -> StoreResult<Item> {
        let stored = self.store.get(target)?;
        if !self.is_expired(&stored, self.clock.now()) {
            return Ok(stored.into_item());
        }

        // Re-read under the stripe lock so a put that refreshed the item in
        // the meantime is not deleted.
        let _guard = self.lock(target);
        let current = self.store.get(target)?;
        if !self.is_expired(&current, self.clock.now()) {
            return Ok(current.into_item());
        }
        self.store.del(target)?;
        debug!(target_hex = %target.short_hex(), "expired item removed on read");
        Err(StoreError::ItemNotFound)
    }

    /// Remove the item at `target`, if any.
    pub fn del(&self, target: &Target) -> StoreResult<()> {
        let _guard = self.lock(target);
        self.store.del(target)
    }

    /// Delete every expired record the backend can enumerate and return how
    /// many were removed.
    ///
    /// Never called internally; callers that want bounded memory schedule it
    /// themselves.
    pub fn purge_expired(&self) -> StoreResult<usize> {
        let mut purged = 0;
        for target in self.store.targets()? {
            let _guard = self.lock(&target);
            match self.store.get(&target) {
                Ok(stored) if self.is_expired(&stored, self.clock.now()) => {
                    self.store.del(&target)?;
                    purged += 1;
                }
                Ok(_) | Err(StoreError::ItemNotFound) => {}
                Err(e) => return Err(e),
            }
        }
        debug!(purged, "expired items purged");
        Ok(purged)
    }

    fn is_expired(&self, stored: &StoredItem, now: SystemTime) -> bool {
        match stored.created().checked_add(self.expiry) {
            Some(deadline) => deadline < now,
            None => false,
        }
    }

    fn lock(&self, target: &Target) -> MutexGuard<'_, ()> {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&target.as_bytes()[..8]);
        let index = (u64::from_le_bytes(prefix) % self.stripes.len() as u64) as usize;
        // The guarded data is `()`, so a panic elsewhere cannot leave it
        // inconsistent.
        self.stripes[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for Wrapper<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapper")
            .field("expiry", &self.expiry)
            .field("stripes", &self.stripes.len())
            .finish()
    }
}
