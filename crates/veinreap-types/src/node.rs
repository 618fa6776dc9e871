//! Grid cell occupants and the equipment snapshot captured at enqueue time.

use serde::{Deserialize, Serialize};

/// The type identity of a grid cell's occupant.
///
/// Two cells belong to the same vein iff their `NodeType` values are
/// equal. The identity is a namespaced name such as `"ore/coal"` or
/// `"ore/deep_iron"`; only equality and the name text matter here,
/// classification heuristics live in the core crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    /// Create a type identity from its namespaced name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The namespaced name, e.g. `"ore/coal"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for NodeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The occupant of a single grid cell.
///
/// Opaque to the harvest core beyond its type identity; the world
/// collaborator decides what else (if anything) a cell carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    /// The cell's type identity.
    pub node_type: NodeType,
}

impl NodeState {
    /// Create a node state with the given type identity.
    pub const fn new(node_type: NodeType) -> Self {
        Self { node_type }
    }
}

/// An immutable copy of an agent's active equipment.
///
/// Captured at request-enqueue time and owned by the request so that the
/// agent swapping tools before the tick drains cannot alter the drop
/// calculation for already-queued work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToolSnapshot {
    /// Display name of the tool, e.g. `"iron_pick"`.
    pub name: String,
    /// Fortune-style enchantment level; multiplies drop counts.
    pub fortune_level: u8,
    /// Whether the tool drops the node itself instead of its refined drop.
    pub silk_touch: bool,
}

impl ToolSnapshot {
    /// Snapshot a plain unenchanted tool by name.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fortune_level: 0,
            silk_touch: false,
        }
    }
}

/// A countable stack of one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Namespaced item name, e.g. `"item/coal"`.
    pub item: String,
    /// Number of items in the stack. Always at least 1.
    pub count: u32,
}

impl ItemStack {
    /// Create a stack of `count` items.
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_equality_is_by_name() {
        assert_eq!(NodeType::from("ore/coal"), NodeType::new("ore/coal"));
        assert_ne!(NodeType::from("ore/coal"), NodeType::from("ore/iron"));
    }

    #[test]
    fn node_type_serializes_transparently() {
        let json = serde_json::to_string(&NodeType::from("ore/coal")).ok();
        assert_eq!(json.as_deref(), Some("\"ore/coal\""));
    }

    #[test]
    fn plain_tool_has_no_enchantments() {
        let tool = ToolSnapshot::plain("stone_pick");
        assert_eq!(tool.fortune_level, 0);
        assert!(!tool.silk_touch);
    }
}
