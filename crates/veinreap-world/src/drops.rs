//! Drop tables: what a node yields when removed.
//!
//! Each harvestable node type maps to a [`DropSpec`]. The yield is a pure
//! function of the node type and the captured tool snapshot: silk touch
//! drops the node itself as an item, otherwise the refined drop count is
//! multiplied by `1 + fortune_level`. Node types without a table entry
//! drop nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use veinreap_types::{ItemStack, NodeType, ToolSnapshot};

use crate::error::WorldError;

/// The drop behavior of one node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSpec {
    /// The refined item the node normally drops, e.g. `"item/coal"`.
    pub item: String,
    /// Base number of items dropped without fortune.
    pub base_count: u32,
    /// The item dropped under silk touch (usually the node itself),
    /// or `None` if silk touch behaves like a normal break.
    pub silk_item: Option<String>,
}

/// Drop tables for all node types in a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTable {
    specs: BTreeMap<NodeType, DropSpec>,
}

impl DropTable {
    /// Create an empty drop table.
    pub const fn new() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// Register the drop behavior for a node type, replacing any previous
    /// entry.
    pub fn register(&mut self, node_type: NodeType, spec: DropSpec) {
        self.specs.insert(node_type, spec);
    }

    /// Compute the stack a node yields for the given tool.
    ///
    /// Returns `Ok(None)` when the type has no table entry or the computed
    /// count is zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the fortune multiplier
    /// overflows the stack count.
    pub fn yield_for(
        &self,
        node_type: &NodeType,
        tool: Option<&ToolSnapshot>,
    ) -> Result<Option<ItemStack>, WorldError> {
        let Some(spec) = self.specs.get(node_type) else {
            return Ok(None);
        };

        if let Some(tool) = tool {
            if tool.silk_touch {
                if let Some(silk_item) = &spec.silk_item {
                    return Ok(Some(ItemStack::new(silk_item.clone(), 1)));
                }
            }
        }

        let multiplier = tool
            .map_or(Some(1), |t| u32::from(t.fortune_level).checked_add(1))
            .ok_or(WorldError::ArithmeticOverflow)?;
        let count = spec
            .base_count
            .checked_mul(multiplier)
            .ok_or(WorldError::ArithmeticOverflow)?;

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(ItemStack::new(spec.item.clone(), count)))
    }
}
