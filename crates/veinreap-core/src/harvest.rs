//! The harvest executor: turns one drained [`HarvestRequest`] into
//! removed nodes, emitted drops, queued collection work, and tracker
//! increments.
//!
//! The trigger node itself is not removed here -- the normal break path
//! already handled it. This executor is responsible for the *connected
//! extra* nodes found by cluster discovery.
//!
//! Failure policy is best-effort: one node failing to remove or drop is
//! logged and skipped, and the rest of the cluster proceeds. Aborting
//! would leave a partially-harvested cluster anyway.

use tracing::{debug, warn};
use veinreap_world::WorldAccess;

use crate::classify::ResourceClassifier;
use crate::cluster;
use crate::queue::{ActionQueue, CollectRequest, HarvestRequest, ScheduledWork};
use crate::tracker::BatchTracker;

/// Execute one harvest request against the live world.
///
/// Returns the number of nodes actually removed, trigger node excluded.
/// A stale request (the trigger cell changed or was declassified between
/// scheduling and draining) returns 0 without side effects.
///
/// `effective_limit` is the configured cluster maximum including the
/// trigger node; discovery runs with one less.
pub fn execute<W: WorldAccess>(
    world: &mut W,
    queue: &ActionQueue,
    tracker: &BatchTracker,
    classifier: &dyn ResourceClassifier,
    request: &HarvestRequest,
    effective_limit: u32,
    now_ms: u64,
) -> u32 {
    // 1. Stale check: the cell must still hold the node the trigger saw.
    let Some(live) = world.node_state(request.position) else {
        debug!(position = %request.position, "stale harvest request: cell is empty");
        return 0;
    };
    if live.node_type != request.origin.node_type || !classifier.is_harvestable(&live) {
        debug!(
            position = %request.position,
            expected = %request.origin.node_type,
            actual = %live.node_type,
            "stale harvest request: cell changed or declassified"
        );
        return 0;
    }

    // 2. Bounded discovery of the connected extras.
    let extra_limit = usize::try_from(effective_limit.saturating_sub(1)).unwrap_or(usize::MAX);
    let positions = if request.cluster_search && extra_limit > 0 {
        cluster::discover(world, request.position, &live.node_type, extra_limit)
    } else {
        Vec::new()
    };

    // 3. Remove each discovered node, emit drops, schedule collection.
    let mut broken: u32 = 0;
    for pos in positions {
        let still_matches = world
            .node_state(pos)
            .is_some_and(|s| s.node_type == live.node_type);
        if !still_matches {
            debug!(position = %pos, "discovered node changed before removal, skipping");
            continue;
        }

        if let Err(error) = world.remove_node(pos) {
            warn!(position = %pos, %error, "failed to remove cluster node, skipping");
            continue;
        }

        // Drops are computed from the tool snapshot captured at enqueue
        // time, so mid-operation equipment changes cannot alter them.
        if let Err(error) = world.emit_drops(pos, &live, request.tool.as_ref()) {
            // The node is already gone; collection may still find drops
            // from neighboring removals, so keep going.
            warn!(position = %pos, %error, "failed to emit drops for cluster node");
        }

        queue.push(ScheduledWork::Collect(CollectRequest {
            position: pos,
            agent: request.agent,
            node_type: live.node_type.clone(),
            tool: request.tool.clone(),
        }));
        tracker.increment(request.agent, &live.node_type, now_ms);
        broken = broken.saturating_add(1);
    }

    broken
}

#[cfg(test)]
mod tests {
    use veinreap_types::{AgentId, BlockPos, NodeState, NodeType, ToolSnapshot};
    use veinreap_world::{DropSpec, DropTable, VoxelWorld};

    use super::*;
    use crate::classify::AcceptAll;

    fn coal() -> NodeType {
        NodeType::from("ore/coal")
    }

    fn coal_world(positions: &[BlockPos]) -> VoxelWorld {
        let mut drops = DropTable::new();
        drops.register(
            coal(),
            DropSpec {
                item: String::from("item/coal"),
                base_count: 1,
                silk_item: None,
            },
        );
        let mut world = VoxelWorld::new(drops);
        for &pos in positions {
            let added = world.add_node(pos, NodeState::new(coal()));
            assert!(added.is_ok());
        }
        world
    }

    fn request_at(pos: BlockPos, agent: AgentId) -> HarvestRequest {
        HarvestRequest {
            position: pos,
            agent,
            origin: NodeState::new(coal()),
            cluster_search: true,
            tool: None,
        }
    }

    /// A cross of 5 neighbors around the trigger plus the trigger itself.
    fn cross_positions() -> Vec<BlockPos> {
        vec![
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            BlockPos::new(-1, 0, 0),
            BlockPos::new(0, 1, 0),
            BlockPos::new(0, -1, 0),
            BlockPos::new(0, 0, 1),
        ]
    }

    #[test]
    fn connected_neighbors_are_harvested() {
        let mut world = coal_world(&cross_positions());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();

        let broken = execute(
            &mut world,
            &queue,
            &tracker,
            &AcceptAll,
            &request_at(BlockPos::new(0, 0, 0), agent),
            10,
            0,
        );

        assert_eq!(broken, 5);
        // Only the trigger node remains; its removal is the break path's job.
        assert_eq!(world.node_count(), 1);
        assert!(world.node_state(BlockPos::new(0, 0, 0)).is_some());
        // One collect request and one drop entity per removed node.
        assert_eq!(queue.len(), 5);
        assert_eq!(world.entity_count(), 5);
        assert_eq!(tracker.active_batches(), 1);
    }

    #[test]
    fn limit_caps_the_harvest() {
        let mut world = coal_world(&cross_positions());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);

        let broken = execute(
            &mut world,
            &queue,
            &tracker,
            &AcceptAll,
            &request_at(BlockPos::new(0, 0, 0), AgentId::new()),
            4, // trigger + 3 extras
            0,
        );

        assert_eq!(broken, 3);
        // Trigger plus the two untouched neighbors remain.
        assert_eq!(world.node_count(), 3);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn stale_request_is_a_no_op() {
        let mut world = coal_world(&cross_positions());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);
        let pos = BlockPos::new(0, 0, 0);
        // The trigger node vanished before the queue drained.
        assert!(world.remove_node(pos).is_ok());

        let broken = execute(
            &mut world,
            &queue,
            &tracker,
            &AcceptAll,
            &request_at(pos, AgentId::new()),
            10,
            0,
        );

        assert_eq!(broken, 0);
        assert!(queue.is_empty());
        assert_eq!(tracker.active_batches(), 0);
        // Neighbors untouched.
        assert_eq!(world.node_count(), 5);
    }

    #[test]
    fn changed_type_is_stale() {
        let mut world = coal_world(&[BlockPos::new(1, 0, 0)]);
        let pos = BlockPos::new(0, 0, 0);
        let added = world.add_node(pos, NodeState::new(NodeType::from("ore/iron")));
        assert!(added.is_ok());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);

        // Request recorded coal, but the cell now holds iron.
        let broken = execute(
            &mut world,
            &queue,
            &tracker,
            &AcceptAll,
            &request_at(pos, AgentId::new()),
            10,
            0,
        );
        assert_eq!(broken, 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn drop_failure_skips_the_drop_but_not_the_cluster() {
        // A drop spec whose fortune multiplication overflows the count,
        // so every emission fails after its node is already removed.
        let mut drops = DropTable::new();
        drops.register(
            coal(),
            DropSpec {
                item: String::from("item/coal"),
                base_count: u32::MAX,
                silk_item: None,
            },
        );
        let mut world = VoxelWorld::new(drops);
        for &pos in &cross_positions() {
            assert!(world.add_node(pos, NodeState::new(coal())).is_ok());
        }
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);
        let mut request = request_at(BlockPos::new(0, 0, 0), AgentId::new());
        request.tool = Some(ToolSnapshot {
            name: String::from("iron_pick"),
            fortune_level: 1,
            silk_touch: false,
        });

        let broken = execute(&mut world, &queue, &tracker, &AcceptAll, &request, 10, 0);

        // Every cluster node is still removed, counted, and scheduled for
        // collection; only the drop entities are missing.
        assert_eq!(broken, 5);
        assert_eq!(world.node_count(), 1);
        assert_eq!(world.entity_count(), 0);
        assert_eq!(queue.len(), 5);
        assert_eq!(tracker.active_batches(), 1);
    }

    #[test]
    fn cluster_search_disabled_harvests_nothing_extra() {
        let mut world = coal_world(&cross_positions());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);
        let mut request = request_at(BlockPos::new(0, 0, 0), AgentId::new());
        request.cluster_search = false;

        let broken = execute(&mut world, &queue, &tracker, &AcceptAll, &request, 10, 0);
        assert_eq!(broken, 0);
        assert_eq!(world.node_count(), 6);
    }

    #[test]
    fn limit_of_one_leaves_no_room_for_extras() {
        let mut world = coal_world(&cross_positions());
        let queue = ActionQueue::new();
        let tracker = BatchTracker::new(300);

        let broken = execute(
            &mut world,
            &queue,
            &tracker,
            &AcceptAll,
            &request_at(BlockPos::new(0, 0, 0), AgentId::new()),
            1,
            0,
        );
        assert_eq!(broken, 0);
        assert_eq!(world.node_count(), 6);
    }
}
