//! Inventory operations for agents.
//!
//! An inventory holds item stacks keyed by item name, subject to a total
//! item-count capacity. All arithmetic is checked -- no silent overflows,
//! no panics. Insertion is all-or-nothing per stack: a stack that does not
//! fit completely is rejected and the corresponding world entity stays
//! where it is (the harvest core never destroys items).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use veinreap_types::ItemStack;

use crate::error::WorldError;

/// A capacity-limited item container belonging to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Item quantities keyed by item name.
    items: BTreeMap<String, u32>,
    /// Maximum total item count across all stacks.
    capacity: u32,
}

impl Inventory {
    /// Create an empty inventory with the given total capacity.
    pub const fn new(capacity: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            capacity,
        }
    }

    /// Total number of items currently held.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the sum overflows.
    pub fn total_count(&self) -> Result<u32, WorldError> {
        let mut total: u32 = 0;
        for qty in self.items.values() {
            total = total
                .checked_add(*qty)
                .ok_or(WorldError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    /// Quantity held of a specific item.
    pub fn count_of(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Attempt to add a full stack.
    ///
    /// Returns `Ok(false)` without modifying the inventory if the stack
    /// does not fit within the remaining capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if checked arithmetic fails.
    pub fn add_stack(&mut self, stack: &ItemStack) -> Result<bool, WorldError> {
        let current = self.total_count()?;
        let new_total = current
            .checked_add(stack.count)
            .ok_or(WorldError::ArithmeticOverflow)?;

        if new_total > self.capacity {
            return Ok(false);
        }

        let entry = self.items.entry(stack.item.clone()).or_insert(0);
        *entry = entry
            .checked_add(stack.count)
            .ok_or(WorldError::ArithmeticOverflow)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inventory_holds_nothing() {
        let inv = Inventory::new(64);
        assert_eq!(inv.total_count().ok(), Some(0));
        assert_eq!(inv.count_of("item/coal"), 0);
    }

    #[test]
    fn add_within_capacity() {
        let mut inv = Inventory::new(10);
        let added = inv.add_stack(&ItemStack::new("item/coal", 4));
        assert_eq!(added.ok(), Some(true));
        assert_eq!(inv.count_of("item/coal"), 4);
    }

    #[test]
    fn add_merges_same_item() {
        let mut inv = Inventory::new(10);
        assert_eq!(inv.add_stack(&ItemStack::new("item/coal", 4)).ok(), Some(true));
        assert_eq!(inv.add_stack(&ItemStack::new("item/coal", 3)).ok(), Some(true));
        assert_eq!(inv.count_of("item/coal"), 7);
        assert_eq!(inv.total_count().ok(), Some(7));
    }

    #[test]
    fn overfull_stack_is_rejected_whole() {
        let mut inv = Inventory::new(5);
        assert_eq!(inv.add_stack(&ItemStack::new("item/coal", 4)).ok(), Some(true));
        // 2 more would exceed capacity 5; nothing is inserted.
        assert_eq!(inv.add_stack(&ItemStack::new("item/coal", 2)).ok(), Some(false));
        assert_eq!(inv.count_of("item/coal"), 4);
    }

    #[test]
    fn exact_fit_is_accepted() {
        let mut inv = Inventory::new(5);
        assert_eq!(inv.add_stack(&ItemStack::new("item/iron", 5)).ok(), Some(true));
        assert_eq!(inv.add_stack(&ItemStack::new("item/iron", 1)).ok(), Some(false));
    }
}
