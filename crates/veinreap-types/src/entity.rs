//! Loose entities: item drops and experience orbs waiting in the world.

use serde::{Deserialize, Serialize};

use crate::grid::EntityPos;
use crate::ids::EntityId;
use crate::node::ItemStack;

/// What a loose entity carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A dropped item stack waiting to be picked up.
    Item {
        /// The dropped stack.
        stack: ItemStack,
    },
    /// An experience orb emitted by a broken node.
    ExperienceOrb {
        /// Experience points carried by the orb.
        amount: u32,
    },
}

/// A loose entity: an item drop or experience orb at a world position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LooseEntity {
    /// The entity's unique identifier.
    pub id: EntityId,
    /// Continuous world position.
    pub position: EntityPos,
    /// What the entity carries.
    pub kind: EntityKind,
}

impl LooseEntity {
    /// Create a dropped item stack at a position.
    pub fn item(position: EntityPos, stack: ItemStack) -> Self {
        Self {
            id: EntityId::new(),
            position,
            kind: EntityKind::Item { stack },
        }
    }

    /// Create an experience orb at a position.
    pub fn orb(position: EntityPos, amount: u32) -> Self {
        Self {
            id: EntityId::new(),
            position,
            kind: EntityKind::ExperienceOrb { amount },
        }
    }

    /// Whether this entity is an item drop.
    pub const fn is_item(&self) -> bool {
        matches!(self.kind, EntityKind::Item { .. })
    }

    /// Whether this entity is an experience orb.
    pub const fn is_orb(&self) -> bool {
        matches!(self.kind, EntityKind::ExperienceOrb { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_and_orb_kinds_are_distinct() {
        let at = EntityPos::new(0.5, 0.5, 0.5);
        let item = LooseEntity::item(at, ItemStack::new("item/coal", 1));
        let orb = LooseEntity::orb(at, 3);
        assert!(item.is_item());
        assert!(!item.is_orb());
        assert!(orb.is_orb());
        assert!(!orb.is_item());
    }
}
