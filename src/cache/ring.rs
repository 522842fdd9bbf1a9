//! Slot Ring Module
//!
//! Fixed-size circular array of key slots plus the recycling queue of
//! vacated slot indices. Both are allocated once at construction.

use std::collections::VecDeque;

// == Slot Ring ==
/// Fixed-length ring of slots, each empty or holding the key bound to it.
///
/// `head` hands out never-used slots until the ring has been filled once;
/// after that every allocation either recycles a free slot or evicts the
/// occupant of `tail`.
#[derive(Debug)]
pub(crate) struct SlotRing {
    slots: Vec<Option<String>>,
    /// Next never-used slot
    head: usize,
    /// Eviction hand and sweep start
    tail: usize,
    /// Slots handed out by `head` so far
    filled: usize,
}

impl SlotRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            tail: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Key bound to `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots[index].as_deref()
    }

    pub fn is_vacant(&self, index: usize) -> bool {
        self.slots[index].is_none()
    }

    pub fn bind(&mut self, index: usize, key: String) {
        debug_assert!(self.is_vacant(index), "slot {index} is already bound");
        self.slots[index] = Some(key);
    }

    /// Empties `index`, returning the key that was bound to it.
    pub fn clear(&mut self, index: usize) -> Option<String> {
        self.slots[index].take()
    }

    /// Hands out the next never-used slot, or None once the ring is full.
    pub fn grow(&mut self) -> Option<usize> {
        if self.filled == self.capacity() {
            return None;
        }
        let index = self.head;
        self.head = self.next(index);
        self.filled += 1;
        Some(index)
    }

    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Moves the tail forward one slot, returning the slot it left.
    pub fn advance_tail(&mut self) -> usize {
        let index = self.tail;
        self.tail = self.next(index);
        index
    }

    pub fn set_tail(&mut self, index: usize) {
        self.tail = index % self.capacity();
    }

    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|key| (index, key)))
    }
}

// == Free Slots ==
/// Bounded FIFO of vacated slot indices, preferred over eviction.
#[derive(Debug)]
pub(crate) struct FreeSlots {
    queue: VecDeque<usize>,
    capacity: usize,
}

impl FreeSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queues a vacated slot. Returns false, dropping the index, when full.
    pub fn push(&mut self, index: usize) -> bool {
        if self.queue.len() >= self.capacity {
            return false;
        }
        self.queue.push_back(index);
        true
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_until_full() {
        let mut ring = SlotRing::new(3);

        assert_eq!(ring.grow(), Some(0));
        assert_eq!(ring.grow(), Some(1));
        assert_eq!(ring.grow(), Some(2));
        assert_eq!(ring.grow(), None);
    }

    #[test]
    fn test_single_slot_ring() {
        let mut ring = SlotRing::new(1);

        assert_eq!(ring.grow(), Some(0));
        assert_eq!(ring.grow(), None);
        assert_eq!(ring.advance_tail(), 0);
        assert_eq!(ring.tail(), 0);
    }

    #[test]
    fn test_bind_and_clear() {
        let mut ring = SlotRing::new(2);

        ring.bind(1, "a".to_string());
        assert_eq!(ring.get(1), Some("a"));
        assert!(ring.is_vacant(0));
        assert_eq!(ring.occupied(), 1);

        assert_eq!(ring.clear(1).as_deref(), Some("a"));
        assert!(ring.is_vacant(1));
        assert_eq!(ring.clear(1), None);
    }

    #[test]
    fn test_tail_wraps() {
        let mut ring = SlotRing::new(3);

        assert_eq!(ring.advance_tail(), 0);
        assert_eq!(ring.advance_tail(), 1);
        assert_eq!(ring.advance_tail(), 2);
        assert_eq!(ring.tail(), 0);

        ring.set_tail(5);
        assert_eq!(ring.tail(), 2);
    }

    #[test]
    fn test_free_slots_fifo_and_bounded() {
        let mut free = FreeSlots::new(2);

        assert!(free.push(4));
        assert!(free.push(7));
        assert!(!free.push(9));
        assert_eq!(free.len(), 2);

        assert_eq!(free.pop(), Some(4));
        assert_eq!(free.pop(), Some(7));
        assert_eq!(free.pop(), None);
    }
}
