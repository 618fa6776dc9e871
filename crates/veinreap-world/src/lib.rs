//! World and inventory collaborator for the veinreap harvest core.
//!
//! The harvest core mutates the world only through the [`WorldAccess`]
//! trait; this crate defines that contract and provides [`VoxelWorld`],
//! the canonical in-memory implementation used by the engine demo and
//! the test suites.
//!
//! # Modules
//!
//! - [`access`] -- the [`WorldAccess`] collaborator trait
//! - [`voxel`] -- [`VoxelWorld`], the sparse in-memory implementation
//! - [`inventory`] -- capacity-limited per-agent item containers
//! - [`drops`] -- per-node-type drop tables honoring tool snapshots
//! - [`error`] -- [`WorldError`]

pub mod access;
pub mod drops;
pub mod error;
pub mod inventory;
pub mod voxel;

pub use access::WorldAccess;
pub use drops::{DropSpec, DropTable};
pub use error::WorldError;
pub use inventory::Inventory;
pub use voxel::VoxelWorld;
