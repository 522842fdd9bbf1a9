//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its expiry metadata and bound ring slot.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Time-to-live; `Duration::ZERO` means the entry never expires
    pub ttl: Duration,
    /// Absolute deadline, None = no expiration
    pub expires_at: Option<Instant>,
    /// Ring slot currently bound to this entry's key
    pub(crate) slot: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry bound to `slot`, with its deadline computed from now.
    pub fn new(value: V, ttl: Duration, slot: usize) -> Self {
        let mut entry = Self {
            value,
            ttl,
            expires_at: None,
            slot,
        };
        entry.touch();
        entry
    }

    // == Touch ==
    /// Restarts the expiry clock. No-op for entries that never expire.
    ///
    /// A TTL too large to be represented as an `Instant` never expires.
    pub fn touch(&mut self) {
        if !self.ttl.is_zero() {
            self.expires_at = Instant::now().checked_add(self.ttl);
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired only once the current time is strictly past its
    /// deadline, so a read exactly at the deadline still hits.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` once the deadline has passed
    /// - `Some(remaining)` while the entry is live
    /// - `None` if the entry has no deadline
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Ring slot bound to this entry.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", Duration::ZERO, 3);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.slot(), 3);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60), 0);

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1u32, Duration::from_millis(50), 0);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_touch_extends_deadline() {
        let mut entry = CacheEntry::new(1u32, Duration::from_millis(100), 0);
        let first = entry.expires_at.unwrap();

        sleep(Duration::from_millis(20));
        entry.touch();

        assert!(entry.expires_at.unwrap() > first);
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let entry = CacheEntry::new(1u32, Duration::MAX, 0);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(1u32, Duration::from_secs(10), 0);

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new(1u32, Duration::ZERO, 0);
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            ttl: Duration::from_secs(1),
            expires_at: Some(now),
            slot: 0,
        };

        // Exactly at the deadline is still live, anything after is not
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }
}
