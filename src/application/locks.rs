use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A record a request needs exclusive access to.
///
/// The derived `Ord` is the global lock order: accounts before payments,
/// then by identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    Account(String),
    Payment(String),
}

impl LockKey {
    pub fn account(id: impl Into<String>) -> Self {
        LockKey::Account(id.into())
    }

    pub fn payment(id: impl Into<String>) -> Self {
        LockKey::Payment(id.into())
    }
}

type Slots = DashMap<LockKey, Arc<Mutex<()>>>;

/// Per-record async mutexes shared by every component touching the store.
///
/// A slot exists only while some request holds or waits on it.
#[derive(Clone, Default)]
pub struct LockTable {
    slots: Arc<Slots>,
}

/// Guards for every key of one request; dropping it releases them all.
pub struct LockSet {
    slots: Arc<Slots>,
    keys: Vec<LockKey>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks all `keys` in the global order, skipping duplicates.
    pub async fn acquire<I>(&self, keys: I) -> LockSet
    where
        I: IntoIterator<Item = LockKey>,
    {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut set = LockSet {
            slots: self.slots.clone(),
            keys: Vec::with_capacity(keys.len()),
            guards: Vec::with_capacity(keys.len()),
        };
        for key in keys {
            tracing::trace!(?key, "acquiring lock");
            let slot = self.slots.entry(key.clone()).or_default().clone();
            // Registered before awaiting so a cancelled acquire still cleans up.
            set.keys.push(key);
            set.guards.push(slot.lock_owned().await);
        }
        set
    }
}

impl Drop for LockSet {
    fn drop(&mut self) {
        self.guards.clear();
        for key in &self.keys {
            // The map's own reference is the only one left once nobody waits.
            self.slots.remove_if(key, |_, slot| Arc::strong_count(slot) == 1);
        }
    }
}
