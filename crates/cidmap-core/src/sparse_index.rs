//! Sparse integer index.
//!
//! A flat `u32 → u32` map for domains far smaller than the key range: byte
//! codes up to 4 bytes wide, CIDs up to tens of thousands. Lookups return
//! `Option` so a missing key is never confused with a stored zero (CID 0 and
//! code 0 are both valid).

use std::collections::HashMap;

/// A sparse mapping from integer keys to integer values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseIntIndex {
    entries: HashMap<u32, u32>,
}

impl SparseIntIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn put(&mut self, key: u32, value: u32) -> Option<u32> {
        self.entries.insert(key, value)
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: u32) -> Option<u32> {
        self.entries.get(&key).copied()
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: u32) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index_has_no_entries() {
        let index = SparseIntIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.get(0), None);
        assert_eq!(index.get(u32::MAX), None);
    }

    #[test]
    fn stored_zero_is_not_absent() {
        let mut index = SparseIntIndex::new();
        index.put(0, 0);
        assert_eq!(index.get(0), Some(0));
        assert!(index.contains_key(0));
        assert_eq!(index.get(1), None);
        assert!(!index.contains_key(1));
    }

    #[test]
    fn put_overwrites_and_returns_previous() {
        let mut index = SparseIntIndex::with_capacity(4);
        assert_eq!(index.put(0x8140, 633), None);
        assert_eq!(index.put(0x8140, 634), Some(633));
        assert_eq!(index.get(0x8140), Some(634));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn full_width_keys() {
        let mut index = SparseIntIndex::new();
        index.put(0xFFFF_FFFF, 7);
        index.put(0x0001_0000, 8);
        assert_eq!(index.get(0xFFFF_FFFF), Some(7));
        assert_eq!(index.get(0x0001_0000), Some(8));
        assert_eq!(index.len(), 2);
    }
}
