use crate::lock;
use crate::storage::Storage;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Mutex;

/// Ids the user flagged as seen. Lives and persists independently of
/// the record collection: an id may stay marked after its record is
/// gone, and such stale marks are filtered at read time by the stats
/// layer, not here.
pub struct WatchedSet {
    ids: Mutex<HashSet<u64>>,
    storage: Storage,
}

impl WatchedSet {
    pub fn load(storage: Storage) -> Self {
        let ids: HashSet<u64> = storage.load_watched().into_iter().collect();
        Self {
            ids: Mutex::new(ids),
            storage,
        }
    }

    /// Flip the mark for an id and persist. Returns the new state. The
    /// lock is held across the write so concurrent toggles cannot
    /// persist a stale snapshot over a newer one.
    pub fn toggle(&self, id: u64) -> Result<bool> {
        let mut ids = lock(&self.ids);
        let marked = if ids.contains(&id) {
            ids.remove(&id);
            false
        } else {
            ids.insert(id);
            true
        };
        let mut snapshot: Vec<u64> = ids.iter().copied().collect();
        snapshot.sort_unstable();
        self.storage.save_watched(&snapshot)?;
        Ok(marked)
    }

    pub fn contains(&self, id: u64) -> bool {
        lock(&self.ids).contains(&id)
    }

    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = lock(&self.ids).iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        lock(&self.ids).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.ids).is_empty()
    }

    pub fn clear(&self) -> Result<()> {
        let mut ids = lock(&self.ids);
        ids.clear();
        self.storage.clear_watched()
    }
}
