//! Fixed-capacity edge lookup table
//!
//! Maps an ordered `(tail, head)` vertex pair to the id of the edge record
//! between them. The slot array is sized once from the expected edge count
//! and never grows; collisions are resolved by linear probing. Hashing uses
//! `fxhash`, which carries no random state, so probe sequences and therefore
//! lookups are identical across runs.

use crate::algorithm::graph::max_flow::FlowError;
use crate::data_structures::flow_network::EdgeId;

const MIN_SLOTS: usize = 8;

/// Packs an ordered vertex pair into a single key.
#[inline]
fn pack_key(tail: usize, head: usize) -> u64 {
    ((tail as u64) << 32) | (head as u64 & 0xFFFF_FFFF)
}

/// Open-addressing table from vertex pairs to edge ids
#[derive(Debug, Clone)]
pub struct EdgeTable {
    slots: Box<[Option<(u64, EdgeId)>]>,
    mask: usize,
    len: usize,
}

impl EdgeTable {
    /// Creates a table able to hold `expected_edges` bindings while keeping
    /// the load factor at or below one half.
    pub fn with_capacity(expected_edges: usize) -> Self {
        let slot_count = expected_edges
            .saturating_mul(2)
            .max(MIN_SLOTS)
            .checked_next_power_of_two()
            .unwrap_or(1 << (usize::BITS - 1));

        Self {
            slots: vec![None; slot_count].into_boxed_slice(),
            mask: slot_count - 1,
            len: 0,
        }
    }

    #[inline]
    fn home_slot(&self, key: u64) -> usize {
        fxhash::hash64(&key) as usize & self.mask
    }

    /// Binds `(tail, head)` to `edge`.
    ///
    /// Returns `Ok(false)` without touching the table if the pair is already
    /// bound, and [`FlowError::IndexFull`] if no free slot is left.
    pub fn insert(&mut self, tail: usize, head: usize, edge: EdgeId) -> Result<bool, FlowError> {
        let key = pack_key(tail, head);
        let start = self.home_slot(key);

        for probe in 0..self.slots.len() {
            let idx = (start + probe) & self.mask;
            match self.slots[idx] {
                Some((existing, _)) if existing == key => return Ok(false),
                Some(_) => continue,
                None => {
                    self.slots[idx] = Some((key, edge));
                    self.len += 1;
                    return Ok(true);
                }
            }
        }

        Err(FlowError::IndexFull {
            capacity: self.slots.len(),
        })
    }

    /// Returns the edge bound to `(tail, head)`, if any.
    pub fn get(&self, tail: usize, head: usize) -> Option<EdgeId> {
        let key = pack_key(tail, head);
        let start = self.home_slot(key);

        for probe in 0..self.slots.len() {
            match self.slots[(start + probe) & self.mask] {
                Some((existing, edge)) if existing == key => return Some(edge),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    pub fn contains(&self, tail: usize, head: usize) -> bool {
        self.get(tail, head).is_some()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, fixed at construction
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut table = EdgeTable::with_capacity(3);
        assert!(table.insert(0, 2, 0).unwrap());
        assert!(table.insert(2, 3, 1).unwrap());
        assert!(table.insert(3, 1, 2).unwrap());

        assert_eq!(table.get(0, 2), Some(0));
        assert_eq!(table.get(2, 3), Some(1));
        assert_eq!(table.get(3, 1), Some(2));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_pairs_are_ordered() {
        let mut table = EdgeTable::with_capacity(2);
        table.insert(4, 7, 0).unwrap();

        assert!(table.contains(4, 7));
        assert!(!table.contains(7, 4));
        assert_eq!(table.get(7, 4), None);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = EdgeTable::with_capacity(2);
        assert!(table.insert(0, 1, 0).unwrap());
        assert!(!table.insert(0, 1, 5).unwrap());

        assert_eq!(table.get(0, 1), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_capacity_is_fixed() {
        let table = EdgeTable::with_capacity(0);
        assert_eq!(table.capacity(), MIN_SLOTS);
        assert!(table.is_empty());

        let table = EdgeTable::with_capacity(100);
        assert_eq!(table.capacity(), 256);
    }

    #[test]
    fn test_full_table_reports_error() {
        let mut table = EdgeTable::with_capacity(0);
        for v in 0..MIN_SLOTS {
            assert!(table.insert(v, v + 1, v).unwrap());
        }
        assert!(matches!(
            table.insert(100, 101, 99),
            Err(FlowError::IndexFull { capacity: MIN_SLOTS })
        ));
        // every binding survives a full table
        for v in 0..MIN_SLOTS {
            assert_eq!(table.get(v, v + 1), Some(v));
        }
        assert_eq!(table.get(100, 101), None);
    }

    #[test]
    fn test_many_colliding_keys() {
        let n = 64;
        let mut table = EdgeTable::with_capacity(n * n);
        let mut id = 0;
        for tail in 0..n {
            for head in 0..n {
                assert!(table.insert(tail, head, id).unwrap());
                id += 1;
            }
        }

        let mut id = 0;
        for tail in 0..n {
            for head in 0..n {
                assert_eq!(table.get(tail, head), Some(id));
                id += 1;
            }
        }
        assert_eq!(table.get(n, 0), None);
    }
}
