//! Drop and experience collection for one harvested cell.
//!
//! Runs on the tick after the harvest that scheduled it. Scans a small
//! region for loose item drops and moves them into the agent's
//! inventory; items that do not fit are left in the world untouched --
//! this step never destroys an item. For whitelisted node types the
//! default experience orbs are suppressed and a type-specific random
//! amount is granted directly instead.
//!
//! Batch tracking is *not* updated here; the harvest executor already
//! counted the node when it was removed.

use rand::Rng;
use tracing::debug;
use veinreap_world::WorldAccess;

use crate::config::CollectConfig;
use crate::error::CoreError;
use crate::queue::CollectRequest;

/// What one collection pass achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectOutcome {
    /// Total items moved into the inventory.
    pub items_collected: u32,
    /// Experience points granted directly (0 for non-whitelisted types).
    pub experience_granted: u32,
}

/// Collect drops and experience around a harvested cell.
///
/// # Errors
///
/// Returns [`CoreError::World`] if an inventory or experience operation
/// fails unexpectedly (e.g. the agent is unknown to the world). A full
/// inventory is not an error; the affected items simply stay put.
pub fn collect<W: WorldAccess, R: Rng + ?Sized>(
    world: &mut W,
    request: &CollectRequest,
    config: &CollectConfig,
    rng: &mut R,
) -> Result<CollectOutcome, CoreError> {
    let center = request.position.center();
    let mut outcome = CollectOutcome::default();
    let mut any_inserted = false;

    for entity in world.entities_in_region(center, config.item_radius) {
        let veinreap_types::EntityKind::Item { stack } = &entity.kind else {
            continue;
        };
        if world.insert_into_inventory(request.agent, stack)? {
            world.remove_entity(entity.id);
            outcome.items_collected = outcome.items_collected.saturating_add(stack.count);
            any_inserted = true;
        } else {
            debug!(
                agent = %request.agent,
                item = stack.item,
                count = stack.count,
                "inventory full, leaving drop in the world"
            );
        }
    }

    if any_inserted {
        world.play_pickup_feedback(request.agent);
    }

    if let Some(range) = config.experience_ranges.get(request.node_type.as_str()) {
        // Suppress the default orb drops before granting directly.
        for entity in world.entities_in_region(center, config.orb_radius) {
            if entity.is_orb() {
                world.remove_entity(entity.id);
            }
        }

        let amount = if range.min <= range.max {
            rng.random_range(range.min..=range.max)
        } else {
            range.min
        };
        if amount > 0 {
            world.grant_experience(request.agent, amount)?;
            outcome.experience_granted = amount;
        }
    }

    Ok(outcome)
}
