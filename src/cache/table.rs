//! Table Cache Module
//!
//! Per-table record storage: a key-to-entry map plus a mirrored set of
//! dirty keys kept for flush efficiency.

use std::collections::{HashMap, HashSet};

use crate::cache::{CacheEntry, Record};

// == Table Cache ==
/// Cached records for a single table.
///
/// The dirty-key set duplicates each entry's `dirty` flag so a flush can
/// collect its batch without scanning every entry. Invariant: a key is in
/// `dirty_keys` if and only if the corresponding entry exists and is dirty.
/// All mutation goes through the methods below, which update flag and set
/// together; the engine-wide lock makes each call atomic.
#[derive(Debug, Default)]
pub struct TableCache {
    /// Key-to-entry storage
    entries: HashMap<String, CacheEntry>,
    /// Keys whose entries are currently dirty
    dirty_keys: HashSet<String>,
}

impl TableCache {
    // == Constructor ==
    /// Creates an empty table cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert Dirty ==
    /// Stores a record as dirty, creating or replacing the entry, and
    /// records its key in the dirty set.
    pub fn insert_dirty(&mut self, key: &str, payload: Record, now: u64) {
        match self.entries.get_mut(key) {
            Some(entry) => entry.mark_dirty(payload, now),
            None => {
                self.entries
                    .insert(key.to_string(), CacheEntry::new_dirty(payload, now));
            }
        }
        self.dirty_keys.insert(key.to_string());
    }

    // == Insert Clean ==
    /// Materializes a record loaded from the backing store as a clean entry.
    ///
    /// Only called for keys that are not currently cached; a dirty entry is
    /// never silently replaced by stale store data.
    pub fn insert_clean(&mut self, key: &str, payload: Record, now: u64) {
        debug_assert!(!self.dirty_keys.contains(key));
        self.entries
            .insert(key.to_string(), CacheEntry::new_clean(payload, now));
    }

    // == Get ==
    /// Returns a mutable reference to the entry for `key`, if cached.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    /// Returns the entry for `key`, if cached.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Dirty Batch ==
    /// Collects `(key, payload)` pairs for every key in the dirty set whose
    /// entry still exists and is still dirty.
    pub fn dirty_batch(&self) -> Vec<(String, Record)> {
        self.dirty_keys
            .iter()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .filter(|entry| entry.dirty)
                    .map(|entry| (key.clone(), entry.payload.clone()))
            })
            .collect()
    }

    // == Mark Clean ==
    /// Clears an entry's dirty flag and removes its key from the dirty set.
    ///
    /// Both sides of the mirror change in one call so there is no window
    /// where an entry is neither dirty-pending nor clean.
    pub fn mark_clean(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.mark_clean();
        }
        self.dirty_keys.remove(key);
    }

    // == Evict Idle ==
    /// Removes every clean entry idle for longer than `threshold_ms` and
    /// returns the number removed. Dirty entries are never evicted.
    pub fn evict_idle(&mut self, now: u64, threshold_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.dirty || !entry.is_idle(now, threshold_ms));
        before - self.entries.len()
    }

    // == Aged Dirty Check ==
    /// Returns true if any entry has been dirty for at least `age_ms`.
    pub fn has_aged_dirty(&self, now: u64, age_ms: u64) -> bool {
        self.dirty_keys.iter().any(|key| {
            self.entries
                .get(key)
                .is_some_and(|entry| entry.is_aged_dirty(now, age_ms))
        })
    }

    // == Length ==
    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of keys pending flush.
    pub fn dirty_len(&self) -> usize {
        self.dirty_keys.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Invariant Check ==
    /// Verifies the dirty-set mirror invariant. Test-only helper.
    #[cfg(test)]
    pub fn mirror_invariant_holds(&self) -> bool {
        let flags: HashSet<&String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.dirty)
            .map(|(key, _)| key)
            .collect();
        flags == self.dirty_keys.iter().collect()
    }
}
