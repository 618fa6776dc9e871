//! The [`WorldAccess`] collaborator trait.
//!
//! This is the single typed contract between the harvest core and the host
//! world: every grid, entity, inventory, and experience mutation the core
//! performs goes through it, so hosts integrate by implementing one trait.
//! [`VoxelWorld`] is the canonical in-memory implementation used by the
//! engine and by tests.
//!
//! All methods are called exclusively from the tick thread; implementations
//! need no internal synchronization.
//!
//! [`VoxelWorld`]: crate::voxel::VoxelWorld

use veinreap_types::{
    AgentId, BlockPos, EntityId, EntityPos, ItemStack, LooseEntity, NodeState, ToolSnapshot,
};

use crate::error::WorldError;

/// Read and mutate access to the voxel grid, loose entities, and agent
/// inventories.
///
/// Drop emission is assumed to be fully determined by the node state and
/// the captured [`ToolSnapshot`]; implementations whose drop model depends
/// on additional live state must re-verify that assumption before use.
pub trait WorldAccess {
    /// The current occupant of a cell, or `None` if the cell is empty.
    fn node_state(&self, pos: BlockPos) -> Option<NodeState>;

    /// Remove the node occupying a cell, leaving the cell empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NodeNotFound`] if the cell is already empty.
    fn remove_node(&mut self, pos: BlockPos) -> Result<(), WorldError>;

    /// Emit the natural drops of a node as loose item entities at the
    /// cell's center, honoring the tool snapshot (fortune, silk touch).
    ///
    /// A node type with no drop table emits nothing; that is not an error.
    fn emit_drops(
        &mut self,
        pos: BlockPos,
        state: &NodeState,
        tool: Option<&ToolSnapshot>,
    ) -> Result<(), WorldError>;

    /// Snapshot all loose entities within `radius` of `center`.
    fn entities_in_region(&self, center: EntityPos, radius: f64) -> Vec<LooseEntity>;

    /// Remove a loose entity from the world. Returns `false` if it was
    /// already gone.
    fn remove_entity(&mut self, id: EntityId) -> bool;

    /// Attempt to insert a stack into the agent's inventory.
    ///
    /// Returns `Ok(false)` if the inventory cannot accept the full stack;
    /// the caller must then leave the corresponding world entity in place.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAgent`] if the agent has no inventory.
    fn insert_into_inventory(
        &mut self,
        agent: AgentId,
        stack: &ItemStack,
    ) -> Result<bool, WorldError>;

    /// Grant experience points directly to the agent, bypassing orbs.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAgent`] if the agent is not known.
    fn grant_experience(&mut self, agent: AgentId, amount: u32) -> Result<(), WorldError>;

    /// Whether the agent can currently be resolved to a live handle
    /// (still connected). Summaries for unresolvable agents are dropped.
    fn resolve_agent(&self, agent: AgentId) -> bool;

    /// Play the item-pickup acknowledgment for an agent.
    fn play_pickup_feedback(&mut self, agent: AgentId);
}
