//! Cache Store Module
//!
//! Main cache engine: a key index over a fixed slot ring, with a free-slot
//! queue for recycling expired slots and eviction by slot position.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cache::ring::{FreeSlots, SlotRing};
use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheOptions;
use crate::error::{CacheError, Result};

/// Number of slots one sweep pass scans: `floor(log2(capacity)) + 1`.
pub fn sweep_window_len(capacity: usize) -> usize {
    (usize::BITS - capacity.leading_zeros()) as usize
}

/// What a slot holds once it has been checked against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occupancy {
    Vacant,
    Live,
    Expired,
}

// == Cache Store ==
/// Fixed-capacity cache state. Not synchronized; see [`crate::Cache`] for the
/// shared, locked handle.
///
/// The slot ring owns slot assignment. The index maps keys to entries and is
/// corrected whenever it disagrees with the ring.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key index
    entries: HashMap<String, CacheEntry<V>>,
    /// Slot ownership
    ring: SlotRing,
    /// Slots vacated by expiry or removal
    free: FreeSlots,
    stats: CacheStats,
    refresh_ttl: bool,
    /// Slots scanned per sweep pass
    window: usize,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a store with every slot preallocated.
    ///
    /// # Errors
    /// [`CacheError::MaxSizeIsZero`] when `options.max_size` is zero.
    pub fn new(options: &CacheOptions) -> Result<Self> {
        let capacity = options.max_size;
        if capacity == 0 {
            return Err(CacheError::MaxSizeIsZero);
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            ring: SlotRing::new(capacity),
            free: FreeSlots::new(capacity),
            stats: CacheStats::new(capacity),
            refresh_ttl: options.refresh_ttl,
            window: sweep_window_len(capacity),
        })
    }

    // == Get ==
    /// Returns the value for `key` unless it is absent or expired.
    ///
    /// An expired entry is removed and its slot queued for reuse. With
    /// `refresh_ttl` enabled a hit restarts the entry's expiry clock.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.read(key, false)
    }

    // == Forced Get ==
    /// Like [`get`](Self::get), but an expired entry's last value is returned
    /// as it is removed. Subsequent reads miss.
    pub fn forced_get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.read(key, true)
    }

    fn read(&mut self, key: &str, forced: bool) -> Option<V>
    where
        V: Clone,
    {
        let refresh = self.refresh_ttl;
        if let Some(entry) = self.entries.get_mut(key).filter(|entry| !entry.is_expired()) {
            if refresh {
                entry.touch();
            }
            self.stats.record_hit();
            return Some(entry.value.clone());
        }

        // Present here means expired
        match self.expire(key) {
            Some(entry) if forced => {
                self.stats.record_hit();
                Some(entry.value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`. A zero `ttl` never expires.
    ///
    /// Updating an existing key keeps its slot. A new key takes a recycled
    /// slot, then a never-used one, and only then evicts whatever occupies
    /// the tail slot.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();

        if let Some(entry) = self.entries.get_mut(&key) {
            if self.ring.get(entry.slot) == Some(key.as_str()) {
                *entry = CacheEntry::new(value, ttl, entry.slot);
                return;
            }
        }

        if let Some(slot) = self.entries.get(&key).map(CacheEntry::slot) {
            self.reconcile(&key, slot);
        }

        let slot = self.acquire_slot();
        self.ring.bind(slot, key.clone());
        self.entries.insert(key, CacheEntry::new(value, ttl, slot));
    }

    // == Remove ==
    /// Deletes `key`, returning its value if it had not expired.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let entry = self.release(key)?;
        if entry.is_expired() {
            self.stats.record_expirations(1);
            return None;
        }
        Some(entry.value)
    }

    // == Sweep ==
    /// Scans one window of slots starting at the tail, removing expired
    /// entries and clearing cells the index no longer backs. The tail then
    /// moves past the window.
    ///
    /// Returns the number of expired entries removed.
    pub fn sweep_window(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        let mut cursor = self.ring.tail();

        for _ in 0..self.window {
            if self.heal(cursor, now) == Occupancy::Expired {
                self.expire_slot(cursor);
                removed += 1;
            }
            cursor = self.ring.next(cursor);
        }

        self.ring.set_tail(cursor);
        removed
    }

    /// True when a pass removed at least a quarter of its window.
    pub fn is_hot(&self, removed: usize) -> bool {
        removed * 4 >= self.window
    }

    // == Slot Allocation ==
    /// Eviction follows slot position: a key placed in a recycled slot is
    /// evicted when the tail reaches that slot, even ahead of older keys.
    fn acquire_slot(&mut self) -> usize {
        while let Some(slot) = self.free.pop() {
            if self.ring.is_vacant(slot) {
                return slot;
            }
        }

        while let Some(slot) = self.ring.grow() {
            if self.ring.is_vacant(slot) {
                return slot;
            }
        }

        let slot = self.ring.advance_tail();
        if let Some(victim) = self.ring.clear(slot) {
            let bound = self.entries.get(&victim).filter(|entry| entry.slot == slot);
            match bound.map(|entry| entry.is_expired()) {
                Some(true) => self.stats.record_expirations(1),
                Some(false) => {
                    self.stats.record_eviction();
                    debug!(key = %victim, slot, "evicted entry to admit a new key");
                }
                None => return slot,
            }
            self.entries.remove(&victim);
        }
        slot
    }

    // == Consistency ==
    /// Checks the occupant of `slot` against the index, healing any
    /// disagreement in favour of the ring.
    fn heal(&mut self, slot: usize, now: Instant) -> Occupancy {
        let Some(key) = self.ring.get(slot) else {
            return Occupancy::Vacant;
        };

        match self.entries.get(key).map(CacheEntry::slot) {
            Some(bound) if bound == slot => {}
            Some(bound) if self.ring.get(bound) != Some(key) => {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.slot = slot;
                }
            }
            _ => {
                debug!(slot, key, "clearing slot without a matching index entry");
                self.vacate(slot);
                return Occupancy::Vacant;
            }
        }

        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => Occupancy::Expired,
            _ => Occupancy::Live,
        }
    }

    /// Drops an index binding the ring does not back, then validates
    /// whoever actually holds the slot.
    fn reconcile(&mut self, key: &str, slot: usize) {
        warn!(
            key,
            slot,
            occupant = ?self.ring.get(slot),
            "index entry disagrees with slot ring, rebinding key"
        );
        self.entries.remove(key);

        if self.heal(slot, Instant::now()) == Occupancy::Expired {
            self.expire_slot(slot);
        }
    }

    fn expire(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.release(key)?;
        self.stats.record_expirations(1);
        Some(entry)
    }

    fn expire_slot(&mut self, slot: usize) {
        if let Some(key) = self.ring.clear(slot) {
            self.entries.remove(&key);
        }
        self.vacate(slot);
        self.stats.record_expirations(1);
    }

    /// Removes `key` from the index and frees its slot.
    fn release(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        if self.ring.get(entry.slot) == Some(key) {
            self.vacate(entry.slot);
        }
        Some(entry)
    }

    fn vacate(&mut self, slot: usize) {
        self.ring.clear(slot);
        if !self.free.push(slot) {
            warn!(slot, "free slot queue is full, slot left for the eviction hand");
        }
    }

    // == Accessors ==
    /// Current number of entries, expired ones not yet removed included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Slots scanned per sweep pass.
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.entries.len() <= self.ring.capacity());
        assert_eq!(self.entries.len(), self.ring.occupied());

        for (key, entry) in &self.entries {
            assert_eq!(self.ring.get(entry.slot), Some(key.as_str()), "entry {key} misbound");
        }
        for (slot, key) in self.ring.iter() {
            assert_eq!(self.entries.get(key).map(CacheEntry::slot), Some(slot));
        }
        for slot in self.free.iter() {
            assert!(self.ring.is_vacant(slot), "queued slot {slot} is occupied");
        }
    }
}
