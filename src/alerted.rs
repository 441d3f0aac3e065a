//! Deduplication cache of devices that have already raised an alert in
//! this process lifetime.

use crate::{constants::ALERTED_CAPACITY, zdo::NetworkAddress};

/// Bounded membership set with circular overwrite once full. While there
/// is room, insertions append in arrival order; once full, a write cursor
/// wraps over the slots so the oldest entry is the eviction victim.
#[derive(Debug, Default)]
pub struct AlertedSet {
    slots: heapless::Vec<NetworkAddress, ALERTED_CAPACITY>,
    cursor: usize,
}

impl AlertedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, addr: NetworkAddress) -> bool {
        self.slots.iter().any(|&slot| slot == addr)
    }

    /// Insert an address, returning false if it was already present.
    pub fn insert(&mut self, addr: NetworkAddress) -> bool {
        if self.contains(addr) {
            return false;
        }
        if self.slots.push(addr).is_err() {
            self.slots[self.cursor] = addr;
            self.cursor = (self.cursor + 1) % ALERTED_CAPACITY;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u16) -> NetworkAddress {
        NetworkAddress(n)
    }

    #[test]
    fn members_are_found_until_eviction() {
        let mut set = AlertedSet::new();
        for n in 0..ALERTED_CAPACITY as u16 {
            assert!(set.insert(addr(n)));
        }
        for n in 0..ALERTED_CAPACITY as u16 {
            assert!(set.contains(addr(n)));
        }
        assert_eq!(set.len(), ALERTED_CAPACITY);
    }

    #[test]
    fn seventeenth_distinct_insert_evicts_the_oldest() {
        let mut set = AlertedSet::new();
        for n in 0..=ALERTED_CAPACITY as u16 {
            assert!(set.insert(addr(n)));
        }
        assert!(!set.contains(addr(0)));
        assert!(set.contains(addr(ALERTED_CAPACITY as u16)));
        assert_eq!(set.len(), ALERTED_CAPACITY);
    }

    #[test]
    fn overwrite_continues_around_the_ring() {
        let mut set = AlertedSet::new();
        for n in 0..(ALERTED_CAPACITY as u16 + 3) {
            set.insert(addr(n));
        }
        for n in 0..3 {
            assert!(!set.contains(addr(n)));
        }
        for n in 3..(ALERTED_CAPACITY as u16 + 3) {
            assert!(set.contains(addr(n)));
        }
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut set = AlertedSet::new();
        assert!(set.insert(addr(0x1234)));
        assert!(!set.insert(addr(0x1234)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_insert_when_full_does_not_advance_the_cursor() {
        let mut set = AlertedSet::new();
        for n in 0..ALERTED_CAPACITY as u16 {
            set.insert(addr(n));
        }
        assert!(!set.insert(addr(5)));
        // Next distinct insert still evicts the oldest entry.
        assert!(set.insert(addr(0x9999)));
        assert!(!set.contains(addr(0)));
        assert!(set.contains(addr(1)));
    }
}
