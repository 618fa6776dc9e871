//! Demo engine binary for the vein-harvesting core.
//!
//! Wires the harvest coordinator to an in-memory voxel world and runs a
//! scripted agent that mines a small seeded ore field vein by vein,
//! logging each batched summary as it finalizes.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `veinreap.yaml`
//! 3. Seed the demo world with an ore field
//! 4. Register the scripted agent
//! 5. Create the harvest coordinator
//! 6. Run the tick loop until the field is exhausted
//! 7. Log the result
//!
//! Per tick the loop mirrors the host contract: the coordinator drains
//! first, then any pending trigger break completes through the normal
//! break path, then the script delivers the next trigger event while its
//! node is still live.

mod error;
mod seed;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use veinreap_core::config::VeinreapConfig;
use veinreap_core::notify::{LogNotificationSink, NullCountSink};
use veinreap_core::HarvestCoordinator;
use veinreap_types::{AgentId, BlockPos, ToolSnapshot};
use veinreap_world::{VoxelWorld, WorldAccess, WorldError};

use crate::error::EngineError;
use crate::seed::SeededVein;

/// Milliseconds between world ticks.
const TICK_INTERVAL_MS: u64 = 50;

/// Scripted-agent inventory capacity, comfortably above the field size.
const INVENTORY_CAPACITY: u32 = 256;

/// Hard stop for the demo loop.
const MAX_TICKS: u32 = 2_000;

/// Application entry point for the demo engine.
///
/// Initializes all subsystems and runs the demo loop.
///
/// # Errors
///
/// Returns an error if configuration loading or world seeding fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("veinreap-engine starting");

    // 2. Load configuration.
    let config = Arc::new(load_config()?);
    info!(
        max_cluster_size = config.harvest.max_cluster_size,
        effective_limit = config.harvest.effective_limit(),
        hold_grace_ms = config.timing.hold_grace_ms,
        batch_inactivity_ms = config.timing.batch_inactivity_ms,
        "Configuration loaded"
    );

    // 3. Seed the demo world.
    let mut world = VoxelWorld::new(seed::demo_drop_table());
    let mut rng = StdRng::from_os_rng();
    let veins = seed::seed_ore_field(&mut world, &mut rng)?;
    info!(
        veins = veins.len(),
        nodes = world.node_count(),
        "Demo world seeded"
    );

    // 4. Register the scripted agent.
    let agent = AgentId::new();
    world.register_agent(agent, INVENTORY_CAPACITY);
    info!(%agent, "Scripted agent registered");

    // 5. Create the harvest coordinator.
    let coordinator = HarvestCoordinator::new(config);
    info!("Harvest coordinator created, entering tick loop");

    // 6. Run the tick loop.
    let report = run_demo(&coordinator, &mut world, agent, veins).await?;

    // 7. Log the result.
    info!(
        ticks = report.ticks,
        summaries = report.summaries,
        items = world
            .inventory(agent)
            .and_then(|i| i.total_count().ok())
            .unwrap_or(0),
        experience = world.experience_of(agent),
        "veinreap-engine shutdown complete"
    );

    Ok(())
}

/// Totals from one demo run.
struct DemoReport {
    ticks: u32,
    summaries: u32,
}

/// Mine the seeded veins one at a time until the field is exhausted and
/// every batch summary has been delivered.
async fn run_demo(
    coordinator: &HarvestCoordinator,
    world: &mut VoxelWorld,
    agent: AgentId,
    veins: Vec<SeededVein>,
) -> Result<DemoReport, EngineError> {
    let mut notifications = LogNotificationSink;
    let mut counts = NullCountSink;
    let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    let tool = ToolSnapshot::plain("demo_pick");

    let mut remaining = veins.into_iter();
    let mut pending_break: Option<BlockPos> = None;
    let mut ticks: u32 = 0;
    let mut summaries: u32 = 0;

    loop {
        interval.tick().await;
        ticks = ticks.saturating_add(1);

        let report = coordinator.tick(world, &mut notifications, &mut counts);
        summaries = summaries.saturating_add(report.summaries);

        // Complete the previous trigger through the normal break path.
        if let Some(pos) = pending_break.take() {
            complete_break(world, pos, &tool)?;
        }

        // Script: start the next vein once the previous one has fully
        // settled, so each vein finalizes into its own summary.
        if coordinator.queued() == 0 && coordinator.active_batches() == 0 {
            match remaining.next() {
                Some(vein) => {
                    info!(node_type = %vein.node_type, trigger = %vein.trigger, "mining vein");
                    coordinator.handle_hold_message(agent, true);
                    if coordinator.on_node_broken(
                        agent,
                        vein.trigger,
                        &world
                            .node_state(vein.trigger)
                            .ok_or(WorldError::NodeNotFound(vein.trigger))?,
                        Some(tool.clone()),
                    ) {
                        pending_break = Some(vein.trigger);
                    }
                }
                None => {
                    coordinator.handle_hold_message(agent, false);
                    break;
                }
            }
        }

        if ticks >= MAX_TICKS {
            warn!(ticks, "demo exceeded its tick bound, stopping");
            break;
        }
    }

    Ok(DemoReport { ticks, summaries })
}

/// The normal break path for a trigger node: remove it and emit its drop.
fn complete_break(
    world: &mut VoxelWorld,
    pos: BlockPos,
    tool: &ToolSnapshot,
) -> Result<(), EngineError> {
    let Some(state) = world.node_state(pos) else {
        // Already gone; nothing to finish.
        return Ok(());
    };
    world.remove_node(pos)?;
    world.emit_drops(pos, &state, Some(tool))?;
    Ok(())
}

/// Load the configuration from `veinreap.yaml`, falling back to defaults
/// when the file is absent.
fn load_config() -> Result<VeinreapConfig, EngineError> {
    let config_path = Path::new("veinreap.yaml");
    if config_path.exists() {
        let config = VeinreapConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(VeinreapConfig::default())
    }
}
