//! Bounded cluster discovery: breadth-first search over the voxel grid.
//!
//! Starting from a trigger cell, [`discover`] finds up to `limit`
//! additional cells whose live type identity equals the trigger's,
//! reachable through 6-connected steps. The trigger cell itself is never
//! part of the result; its removal belongs to the normal break path.
//!
//! Neighbor order is the fixed order of [`BlockPos::neighbors6`], which
//! makes membership deterministic for a given world snapshot and limit:
//! BFS layering first, direction order within a layer. Traversal is
//! read-only.

use std::collections::{BTreeSet, VecDeque};

use veinreap_types::{BlockPos, NodeType};
use veinreap_world::WorldAccess;

/// Find up to `limit` connected same-type cells reachable from `start`.
///
/// `limit` counts *additional* nodes beyond the start; callers typically
/// pass the configured maximum minus one. Each candidate's type is
/// re-checked against the live grid at visit time, not enqueue time, so
/// a cell that changed since it was frontier-queued is skipped.
pub fn discover<W: WorldAccess>(
    world: &W,
    start: BlockPos,
    node_type: &NodeType,
    limit: usize,
) -> Vec<BlockPos> {
    let mut result = Vec::new();
    if limit == 0 {
        return result;
    }

    let mut visited: BTreeSet<BlockPos> = BTreeSet::new();
    visited.insert(start);

    let mut frontier: VecDeque<BlockPos> = VecDeque::new();
    for neighbor in start.neighbors6() {
        if visited.insert(neighbor) {
            frontier.push_back(neighbor);
        }
    }

    while let Some(pos) = frontier.pop_front() {
        let matches = world
            .node_state(pos)
            .is_some_and(|state| state.node_type == *node_type);
        if !matches {
            continue;
        }

        result.push(pos);
        if result.len() >= limit {
            break;
        }

        for neighbor in pos.neighbors6() {
            if visited.insert(neighbor) {
                frontier.push_back(neighbor);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use veinreap_types::{NodeState, NodeType};
    use veinreap_world::{DropTable, VoxelWorld};

    use super::*;

    fn coal() -> NodeType {
        NodeType::from("ore/coal")
    }

    fn world_with(positions: &[BlockPos]) -> VoxelWorld {
        let mut world = VoxelWorld::new(DropTable::new());
        for &pos in positions {
            let added = world.add_node(pos, NodeState::new(coal()));
            assert!(added.is_ok());
        }
        world
    }

    #[test]
    fn line_vein_is_found_in_order() {
        let line = [
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            BlockPos::new(2, 0, 0),
            BlockPos::new(3, 0, 0),
        ];
        let world = world_with(&line);
        let found = discover(&world, BlockPos::new(0, 0, 0), &coal(), 10);
        assert_eq!(
            found,
            vec![
                BlockPos::new(1, 0, 0),
                BlockPos::new(2, 0, 0),
                BlockPos::new(3, 0, 0),
            ]
        );
    }

    #[test]
    fn limit_bounds_the_result() {
        let line: Vec<BlockPos> = (0..10).map(|x| BlockPos::new(x, 0, 0)).collect();
        let world = world_with(&line);
        let found = discover(&world, BlockPos::new(0, 0, 0), &coal(), 3);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let world = world_with(&[BlockPos::new(0, 0, 0), BlockPos::new(1, 0, 0)]);
        assert!(discover(&world, BlockPos::new(0, 0, 0), &coal(), 0).is_empty());
    }

    #[test]
    fn trigger_cell_is_excluded() {
        let world = world_with(&[BlockPos::new(0, 0, 0), BlockPos::new(0, 1, 0)]);
        let found = discover(&world, BlockPos::new(0, 0, 0), &coal(), 10);
        assert_eq!(found, vec![BlockPos::new(0, 1, 0)]);
    }

    #[test]
    fn other_types_block_the_path() {
        let mut world = world_with(&[BlockPos::new(0, 0, 0), BlockPos::new(2, 0, 0)]);
        // An iron node sits between the two coal nodes.
        let added = world.add_node(
            BlockPos::new(1, 0, 0),
            NodeState::new(NodeType::from("ore/iron")),
        );
        assert!(added.is_ok());
        // The far coal node is only reachable through the iron node, so it
        // is not part of the vein.
        assert!(discover(&world, BlockPos::new(0, 0, 0), &coal(), 10).is_empty());
    }

    #[test]
    fn diagonals_are_not_connected() {
        let world = world_with(&[BlockPos::new(0, 0, 0), BlockPos::new(1, 1, 0)]);
        assert!(discover(&world, BlockPos::new(0, 0, 0), &coal(), 10).is_empty());
    }

    #[test]
    fn discovery_is_deterministic() {
        // A 3x3 plate of coal; two passes over an unchanged world agree.
        let plate: Vec<BlockPos> = (0..3)
            .flat_map(|x| (0..3).map(move |z| BlockPos::new(x, 0, z)))
            .collect();
        let world = world_with(&plate);
        let first = discover(&world, BlockPos::new(1, 0, 1), &coal(), 6);
        let second = discover(&world, BlockPos::new(1, 0, 1), &coal(), 6);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn branching_vein_respects_bfs_layering() {
        // Trigger at origin with both +x and +y arms; the first result
        // layer contains the direct neighbors in direction order.
        let world = world_with(&[
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            BlockPos::new(0, 1, 0),
            BlockPos::new(2, 0, 0),
        ]);
        let found = discover(&world, BlockPos::new(0, 0, 0), &coal(), 10);
        assert_eq!(
            found,
            vec![
                BlockPos::new(1, 0, 0),
                BlockPos::new(0, 1, 0),
                BlockPos::new(2, 0, 0),
            ]
        );
    }
}
