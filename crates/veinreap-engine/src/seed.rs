//! Seeds the demo world: a small ore field of random-walk veins plus the
//! drop table covering their types.

use rand::Rng;
use tracing::info;
use veinreap_types::{BlockPos, NodeState, NodeType};
use veinreap_world::{DropSpec, DropTable, VoxelWorld, WorldError};

/// One seeded vein: its type and the node the scripted agent breaks first.
#[derive(Debug, Clone)]
pub struct SeededVein {
    /// The vein's node type.
    pub node_type: NodeType,
    /// The node the scripted agent targets.
    pub trigger: BlockPos,
}

/// The demo veins: type, origin, and target node count. Origins are far
/// enough apart that the veins can never grow into each other.
const VEINS: &[(&str, BlockPos, usize)] = &[
    ("ore/coal", BlockPos::new(0, 0, 0), 8),
    ("ore/iron", BlockPos::new(24, 0, 0), 5),
    ("ore/diamond", BlockPos::new(48, 0, 0), 4),
];

/// Build the drop table for the demo's node types.
pub fn demo_drop_table() -> DropTable {
    let mut drops = DropTable::new();
    for &(ore, _, _) in VEINS {
        let name = ore.trim_start_matches("ore/");
        drops.register(
            NodeType::from(ore),
            DropSpec {
                item: format!("item/{name}"),
                base_count: 1,
                silk_item: Some(format!("node/{name}")),
            },
        );
    }
    drops
}

/// Grow each demo vein into the world by a random walk from its origin.
///
/// Returns one [`SeededVein`] per vein, each with its origin as the
/// scripted trigger node.
///
/// # Errors
///
/// Returns [`WorldError::CellOccupied`] if a vein origin is already
/// taken, which with the fixed origins above cannot happen.
pub fn seed_ore_field<R: Rng + ?Sized>(
    world: &mut VoxelWorld,
    rng: &mut R,
) -> Result<Vec<SeededVein>, WorldError> {
    let mut seeded = Vec::new();
    for &(ore, origin, size) in VEINS {
        let node_type = NodeType::from(ore);
        world.add_node(origin, NodeState::new(node_type.clone()))?;
        let mut placed = vec![origin];

        // Random walk: pick a placed node, step to a random face neighbor.
        // Occupied neighbors are retried; the attempt bound keeps a very
        // unlucky walk from spinning.
        let mut attempts: usize = 0;
        while placed.len() < size && attempts < size.saturating_mul(20) {
            attempts = attempts.saturating_add(1);
            let Some(&from) = placed.get(rng.random_range(0..placed.len())) else {
                break;
            };
            let Some(next) = from.neighbors6().into_iter().nth(rng.random_range(0..6)) else {
                continue;
            };
            if world.add_node(next, NodeState::new(node_type.clone())).is_ok() {
                placed.push(next);
            }
        }

        info!(ore, %origin, nodes = placed.len(), "vein seeded");
        seeded.push(SeededVein {
            node_type,
            trigger: origin,
        });
    }
    Ok(seeded)
}
