//! Error types for the `veinreap-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use veinreap_types::{AgentId, BlockPos};

/// Errors that can occur during world and inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No node occupies the addressed cell.
    #[error("no node at {0}")]
    NodeNotFound(BlockPos),

    /// A node was inserted into a cell that is already occupied.
    #[error("cell {0} is already occupied")]
    CellOccupied(BlockPos),

    /// The agent has no registered inventory in this world.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
