//! Shared type definitions for the veinreap harvest core.
//!
//! This crate is the single source of truth for the types used across the
//! veinreap workspace: grid addressing, node identity, equipment
//! snapshots, loose entities, and the batched harvest summary.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and loose entities
//! - [`grid`] -- [`BlockPos`] cell addresses and [`EntityPos`] float positions
//! - [`node`] -- [`NodeType`] identity, [`NodeState`], [`ToolSnapshot`], [`ItemStack`]
//! - [`entity`] -- [`LooseEntity`] item drops and experience orbs
//! - [`summary`] -- [`HarvestSummary`] batch notification payload

pub mod entity;
pub mod grid;
pub mod ids;
pub mod node;
pub mod summary;

// Re-export all public types at crate root for convenience.
pub use entity::{EntityKind, LooseEntity};
pub use grid::{BlockPos, EntityPos};
pub use ids::{AgentId, EntityId};
pub use node::{ItemStack, NodeState, NodeType, ToolSnapshot};
pub use summary::HarvestSummary;
