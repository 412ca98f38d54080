//! # Inventory Adapter
//!
//! The crafting engine never owns item counts. It reads and writes them
//! through [`InventoryAdapter`], implemented by the host's party/item system.
//!
//! [`PartyInventory`] is a plain in-memory implementation used by the host
//! binary, tests and benchmarks.

use std::collections::{BTreeMap, HashMap};

/// Unique identifier for an item type.
pub type ItemId = u32;

/// Default per-item cap, matching the host engine's party limit.
pub const DEFAULT_MAX_STACK: u32 = 99;

/// Item-count store the engine reads and mutates.
pub trait InventoryAdapter {
    /// Count held of `item_id`, 0 if absent.
    fn count(&self, item_id: ItemId) -> u32;

    /// Overwrites the count held of `item_id`.
    fn set_count(&mut self, item_id: ItemId, count: u32);

    /// Upper bound on the count of any single item.
    fn capacity(&self) -> u32;

    /// Whether `item_id` names an item in the host's database.
    fn is_known_item(&self, item_id: ItemId) -> bool;
}

impl<T: InventoryAdapter + ?Sized> InventoryAdapter for &mut T {
    fn count(&self, item_id: ItemId) -> u32 {
        (**self).count(item_id)
    }

    fn set_count(&mut self, item_id: ItemId, count: u32) {
        (**self).set_count(item_id, count);
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn is_known_item(&self, item_id: ItemId) -> bool {
        (**self).is_known_item(item_id)
    }
}

/// In-memory party inventory.
///
/// Item ids `1..=item_count` are known; every other id is rejected and never
/// stored.
#[derive(Clone, Debug)]
pub struct PartyInventory {
    /// Non-zero counts by item.
    counts: HashMap<ItemId, u32>,
    /// Number of items in the database.
    item_count: u32,
    /// Per-item cap.
    max_stack: u32,
}

impl PartyInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new(item_count: u32, max_stack: u32) -> Self {
        Self {
            counts: HashMap::new(),
            item_count,
            max_stack,
        }
    }

    /// Adds `quantity` of an item, clamped to the per-item cap.
    ///
    /// Returns the amount actually added. Unknown items add nothing.
    pub fn gain(&mut self, item_id: ItemId, quantity: u32) -> u32 {
        if !self.is_known_item(item_id) {
            return 0;
        }
        let current = self.count(item_id);
        let next = current.saturating_add(quantity).min(self.max_stack);
        self.set_count(item_id, next);
        next - current
    }

    /// Number of distinct items held.
    #[must_use]
    pub fn distinct_items(&self) -> usize {
        self.counts.len()
    }

    /// Sorted copy of all non-zero counts.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ItemId, u32> {
        self.counts.iter().map(|(&id, &count)| (id, count)).collect()
    }
}

impl Default for PartyInventory {
    fn default() -> Self {
        Self::new(u32::MAX, DEFAULT_MAX_STACK)
    }
}

impl InventoryAdapter for PartyInventory {
    fn count(&self, item_id: ItemId) -> u32 {
        self.counts.get(&item_id).copied().unwrap_or(0)
    }

    fn set_count(&mut self, item_id: ItemId, count: u32) {
        if !self.is_known_item(item_id) {
            return;
        }
        if count == 0 {
            self.counts.remove(&item_id);
        } else {
            self.counts.insert(item_id, count);
        }
    }

    fn capacity(&self) -> u32 {
        self.max_stack
    }

    fn is_known_item(&self, item_id: ItemId) -> bool {
        item_id > 0 && item_id <= self.item_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_item_counts_zero() {
        let inv = PartyInventory::new(10, 99);
        assert_eq!(inv.count(3), 0);
        assert_eq!(inv.distinct_items(), 0);
    }

    #[test]
    fn test_gain_clamps_to_capacity() {
        let mut inv = PartyInventory::new(10, 99);
        assert_eq!(inv.gain(1, 60), 60);
        assert_eq!(inv.gain(1, 60), 39);
        assert_eq!(inv.count(1), 99);
    }

    #[test]
    fn test_unknown_items_never_stored() {
        let mut inv = PartyInventory::new(10, 99);
        assert!(!inv.is_known_item(0));
        assert!(!inv.is_known_item(11));
        assert_eq!(inv.gain(11, 5), 0);
        inv.set_count(0, 4);
        assert!(inv.snapshot().is_empty());
    }

    #[test]
    fn test_zero_count_removes_entry() {
        let mut inv = PartyInventory::new(10, 99);
        inv.set_count(2, 7);
        inv.set_count(2, 0);
        assert_eq!(inv.distinct_items(), 0);
    }

    #[test]
    fn test_adapter_through_mut_reference() {
        fn bump(mut adapter: impl InventoryAdapter) {
            let count = adapter.count(4);
            adapter.set_count(4, count + 1);
        }

        let mut inv = PartyInventory::new(10, 99);
        bump(&mut inv);
        bump(&mut inv);
        assert_eq!(inv.count(4), 2);
    }
}
