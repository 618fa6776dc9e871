//! The canonical in-memory world: a sparse voxel grid with loose
//! entities and per-agent inventories.
//!
//! [`VoxelWorld`] backs the engine demo and every integration test. The
//! grid is sparse -- only occupied cells are stored -- so worlds of any
//! coordinate extent cost memory proportional to their content.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use veinreap_types::{
    AgentId, BlockPos, EntityId, EntityPos, ItemStack, LooseEntity, NodeState, ToolSnapshot,
};

use crate::access::WorldAccess;
use crate::drops::DropTable;
use crate::error::WorldError;
use crate::inventory::Inventory;

/// A sparse in-memory voxel world.
#[derive(Debug, Clone, Default)]
pub struct VoxelWorld {
    /// Occupied cells only.
    grid: BTreeMap<BlockPos, NodeState>,
    /// Loose entities indexed by their identifier.
    entities: BTreeMap<EntityId, LooseEntity>,
    /// Per-agent inventories.
    inventories: BTreeMap<AgentId, Inventory>,
    /// Accumulated experience per agent.
    experience: BTreeMap<AgentId, u64>,
    /// Agents currently resolvable to a live handle.
    connected: BTreeSet<AgentId>,
    /// Drop behavior per node type.
    drops: DropTable,
    /// Number of pickup acknowledgments played per agent.
    feedback_played: BTreeMap<AgentId, u32>,
}

impl VoxelWorld {
    /// Create an empty world with the given drop table.
    pub const fn new(drops: DropTable) -> Self {
        Self {
            grid: BTreeMap::new(),
            entities: BTreeMap::new(),
            inventories: BTreeMap::new(),
            experience: BTreeMap::new(),
            connected: BTreeSet::new(),
            drops,
            feedback_played: BTreeMap::new(),
        }
    }

    /// Place a node into an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOccupied`] if the cell already holds a node.
    pub fn add_node(&mut self, pos: BlockPos, state: NodeState) -> Result<(), WorldError> {
        if self.grid.contains_key(&pos) {
            return Err(WorldError::CellOccupied(pos));
        }
        self.grid.insert(pos, state);
        Ok(())
    }

    /// Register an agent with an empty inventory of the given capacity and
    /// mark it connected.
    pub fn register_agent(&mut self, agent: AgentId, capacity: u32) {
        self.inventories.insert(agent, Inventory::new(capacity));
        self.connected.insert(agent);
    }

    /// Mark an agent as disconnected. Its inventory is retained; summaries
    /// addressed to it are dropped by the tracker sweep.
    pub fn disconnect_agent(&mut self, agent: AgentId) {
        self.connected.remove(&agent);
    }

    /// Put a loose entity into the world, returning its identifier.
    pub fn spawn_entity(&mut self, entity: LooseEntity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    /// The agent's inventory, if registered.
    pub fn inventory(&self, agent: AgentId) -> Option<&Inventory> {
        self.inventories.get(&agent)
    }

    /// Total experience granted to the agent so far.
    pub fn experience_of(&self, agent: AgentId) -> u64 {
        self.experience.get(&agent).copied().unwrap_or(0)
    }

    /// Number of occupied cells.
    pub fn node_count(&self) -> usize {
        self.grid.len()
    }

    /// Number of loose entities currently in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// How many pickup acknowledgments have been played for the agent.
    pub fn feedback_count(&self, agent: AgentId) -> u32 {
        self.feedback_played.get(&agent).copied().unwrap_or(0)
    }
}

impl WorldAccess for VoxelWorld {
    fn node_state(&self, pos: BlockPos) -> Option<NodeState> {
        self.grid.get(&pos).cloned()
    }

    fn remove_node(&mut self, pos: BlockPos) -> Result<(), WorldError> {
        if self.grid.remove(&pos).is_none() {
            return Err(WorldError::NodeNotFound(pos));
        }
        Ok(())
    }

    fn emit_drops(
        &mut self,
        pos: BlockPos,
        state: &NodeState,
        tool: Option<&ToolSnapshot>,
    ) -> Result<(), WorldError> {
        match self.drops.yield_for(&state.node_type, tool)? {
            Some(stack) => {
                self.spawn_entity(LooseEntity::item(pos.center(), stack));
            }
            None => {
                debug!(node_type = %state.node_type, %pos, "node type has no drops");
            }
        }
        Ok(())
    }

    fn entities_in_region(&self, center: EntityPos, radius: f64) -> Vec<LooseEntity> {
        self.entities
            .values()
            .filter(|e| e.position.distance_to(center) <= radius)
            .cloned()
            .collect()
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn insert_into_inventory(
        &mut self,
        agent: AgentId,
        stack: &ItemStack,
    ) -> Result<bool, WorldError> {
        let inventory = self
            .inventories
            .get_mut(&agent)
            .ok_or(WorldError::UnknownAgent(agent))?;
        inventory.add_stack(stack)
    }

    fn grant_experience(&mut self, agent: AgentId, amount: u32) -> Result<(), WorldError> {
        if !self.inventories.contains_key(&agent) {
            return Err(WorldError::UnknownAgent(agent));
        }
        let entry = self.experience.entry(agent).or_insert(0);
        *entry = entry
            .checked_add(u64::from(amount))
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(())
    }

    fn resolve_agent(&self, agent: AgentId) -> bool {
        self.connected.contains(&agent)
    }

    fn play_pickup_feedback(&mut self, agent: AgentId) {
        let played = self.feedback_played.entry(agent).or_insert(0);
        *played = played.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use veinreap_types::NodeType;

    use super::*;
    use crate::drops::DropSpec;

    fn coal_world() -> VoxelWorld {
        let mut drops = DropTable::new();
        drops.register(
            NodeType::from("ore/coal"),
            DropSpec {
                item: String::from("item/coal"),
                base_count: 1,
                silk_item: None,
            },
        );
        VoxelWorld::new(drops)
    }

    #[test]
    fn add_and_remove_node() {
        let mut world = coal_world();
        let pos = BlockPos::new(0, 0, 0);
        let state = NodeState::new(NodeType::from("ore/coal"));
        assert!(world.add_node(pos, state.clone()).is_ok());
        assert_eq!(world.node_state(pos), Some(state));
        assert!(world.remove_node(pos).is_ok());
        assert_eq!(world.node_state(pos), None);
    }

    #[test]
    fn double_add_is_rejected() {
        let mut world = coal_world();
        let pos = BlockPos::new(0, 0, 0);
        let state = NodeState::new(NodeType::from("ore/coal"));
        assert!(world.add_node(pos, state.clone()).is_ok());
        assert!(matches!(
            world.add_node(pos, state),
            Err(WorldError::CellOccupied(_))
        ));
    }

    #[test]
    fn remove_empty_cell_is_an_error() {
        let mut world = coal_world();
        assert!(matches!(
            world.remove_node(BlockPos::new(1, 2, 3)),
            Err(WorldError::NodeNotFound(_))
        ));
    }

    #[test]
    fn emit_drops_spawns_an_item_entity() {
        let mut world = coal_world();
        let pos = BlockPos::new(0, 0, 0);
        let state = NodeState::new(NodeType::from("ore/coal"));
        assert!(world.emit_drops(pos, &state, None).is_ok());
        assert_eq!(world.entity_count(), 1);
        let found = world.entities_in_region(pos.center(), 0.1);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn region_scan_respects_radius() {
        let mut world = coal_world();
        world.spawn_entity(LooseEntity::item(
            EntityPos::new(0.0, 0.0, 0.0),
            ItemStack::new("item/coal", 1),
        ));
        world.spawn_entity(LooseEntity::item(
            EntityPos::new(5.0, 0.0, 0.0),
            ItemStack::new("item/coal", 1),
        ));
        let near = world.entities_in_region(EntityPos::new(0.0, 0.0, 0.0), 1.5);
        assert_eq!(near.len(), 1);
    }

    #[test]
    fn inventory_insert_requires_registration() {
        let mut world = coal_world();
        let agent = AgentId::new();
        let result = world.insert_into_inventory(agent, &ItemStack::new("item/coal", 1));
        assert!(matches!(result, Err(WorldError::UnknownAgent(_))));

        world.register_agent(agent, 10);
        let result = world.insert_into_inventory(agent, &ItemStack::new("item/coal", 1));
        assert_eq!(result.ok(), Some(true));
    }

    #[test]
    fn experience_accumulates() {
        let mut world = coal_world();
        let agent = AgentId::new();
        world.register_agent(agent, 10);
        assert!(world.grant_experience(agent, 3).is_ok());
        assert!(world.grant_experience(agent, 4).is_ok());
        assert_eq!(world.experience_of(agent), 7);
    }

    #[test]
    fn disconnect_makes_agent_unresolvable() {
        let mut world = coal_world();
        let agent = AgentId::new();
        world.register_agent(agent, 10);
        assert!(world.resolve_agent(agent));
        world.disconnect_agent(agent);
        assert!(!world.resolve_agent(agent));
    }
}
