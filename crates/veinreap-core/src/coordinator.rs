//! The harvest coordinator: single owner of all multi-context state.
//!
//! The hold registry, action queue, and batch tracker could each be a
//! static global; instead they live inside one [`HarvestCoordinator`]
//! constructed at startup and shared by reference, keeping the
//! single-instance-per-process semantics without hidden global state.
//!
//! Thread contract: [`handle_hold_message`] and [`on_node_broken`] are
//! safe from any context (they only touch the internally-synchronized
//! registry, queue, and tracker). [`tick`] must be called exactly once
//! per world tick from the tick-owning thread, with exclusive world
//! access.
//!
//! [`handle_hold_message`]: HarvestCoordinator::handle_hold_message
//! [`on_node_broken`]: HarvestCoordinator::on_node_broken
//! [`tick`]: HarvestCoordinator::tick

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use veinreap_types::{AgentId, BlockPos, HarvestSummary, NodeState, ToolSnapshot};
use veinreap_world::WorldAccess;

use crate::classify::{ResourceClassifier, StrategyClassifier};
use crate::clock::{MonotonicClock, TimeSource};
use crate::collect;
use crate::config::VeinreapConfig;
use crate::harvest;
use crate::hold::HoldRegistry;
use crate::notify::{CountSink, NotificationSink};
use crate::queue::{ActionQueue, HarvestRequest, ScheduledWork};
use crate::tracker::BatchTracker;

/// The current configuration snapshot and the classifier built from it.
///
/// Swapped wholesale on reload; readers clone the [`Arc`]s out under a
/// short lock and work on the consistent pair.
struct Snapshot {
    config: Arc<VeinreapConfig>,
    classifier: Arc<dyn ResourceClassifier>,
}

/// What one tick's drain and sweep accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Harvest requests processed (stale ones included).
    pub harvests: u32,
    /// Collect requests processed.
    pub collects: u32,
    /// Cluster nodes removed across all harvests this tick.
    pub nodes_broken: u32,
    /// Items moved into inventories across all collects this tick.
    pub items_collected: u32,
    /// Experience points granted directly this tick.
    pub experience_granted: u32,
    /// Batch summaries finalized by the sweep this tick.
    pub summaries: u32,
}

/// Owns the hold registry, deferred queue, batch tracker, classifier,
/// clock, and configuration snapshot. One instance per process.
pub struct HarvestCoordinator {
    snapshot: Mutex<Snapshot>,
    clock: Box<dyn TimeSource>,
    queue: ActionQueue,
    hold: HoldRegistry,
    tracker: BatchTracker,
    rng: Mutex<StdRng>,
}

impl HarvestCoordinator {
    /// Create a coordinator from configuration, with the canonical
    /// classifier, monotonic clock, and OS-seeded randomness.
    pub fn new(config: Arc<VeinreapConfig>) -> Self {
        let classifier = Arc::new(StrategyClassifier::from_config(&config.classifier));
        Self::with_parts(
            config,
            classifier,
            Box::new(MonotonicClock::new()),
            StdRng::from_os_rng(),
        )
    }

    /// Create a coordinator with injected classifier, clock, and RNG.
    /// This is the test seam; production code uses [`new`].
    ///
    /// [`new`]: HarvestCoordinator::new
    pub fn with_parts(
        config: Arc<VeinreapConfig>,
        classifier: Arc<dyn ResourceClassifier>,
        clock: Box<dyn TimeSource>,
        rng: StdRng,
    ) -> Self {
        let hold = HoldRegistry::new(config.timing.hold_grace_ms);
        let tracker = BatchTracker::new(config.timing.batch_inactivity_ms);
        Self {
            snapshot: Mutex::new(Snapshot { config, classifier }),
            clock,
            queue: ActionQueue::new(),
            hold,
            tracker,
            rng: Mutex::new(rng),
        }
    }

    /// Replace the configuration snapshot, rebuilding the classifier
    /// from the new classifier section.
    ///
    /// Harvest, collect, and classifier settings take effect from the
    /// next operation. The timing windows (hold grace, batch inactivity)
    /// are fixed at construction and only change on restart.
    pub fn swap_config(&self, config: Arc<VeinreapConfig>) {
        let classifier = Arc::new(StrategyClassifier::from_config(&config.classifier));
        let mut snapshot = self.lock_snapshot();
        snapshot.config = config;
        snapshot.classifier = classifier;
    }

    /// Record an inbound "set holding" transport message for an agent.
    pub fn handle_hold_message(&self, agent: AgentId, active: bool) {
        self.hold.set_holding(agent, active, self.clock.now_ms());
    }

    /// Whether the agent's activation input currently counts as held.
    pub fn is_holding(&self, agent: AgentId) -> bool {
        self.hold.is_holding(agent, self.clock.now_ms())
    }

    /// Handle a node-break trigger event.
    ///
    /// If auto-collect is enabled, the agent is holding the activation
    /// input, and the broken node classifies as harvestable, a harvest
    /// request is enqueued for the next tick. Returns whether a request
    /// was enqueued. Safe from any context; never mutates world state.
    pub fn on_node_broken(
        &self,
        agent: AgentId,
        position: BlockPos,
        state: &NodeState,
        tool: Option<ToolSnapshot>,
    ) -> bool {
        let (config, classifier) = self.current();
        if !config.harvest.auto_collect_enabled {
            return false;
        }
        if !self.hold.is_holding(agent, self.clock.now_ms()) {
            return false;
        }
        if !classifier.is_harvestable(state) {
            debug!(node_type = %state.node_type, "broken node is not harvestable, ignoring");
            return false;
        }

        let effective_limit = config.harvest.effective_limit();
        self.queue.push(ScheduledWork::Harvest(HarvestRequest {
            position,
            agent,
            origin: state.clone(),
            // With room for only the trigger node, discovery has nothing
            // to find; skip it outright.
            cluster_search: effective_limit > 1,
            tool,
        }));
        true
    }

    /// Explicitly finalize an agent's batch (e.g. on disconnect),
    /// returning the summary if one was active.
    pub fn finalize_agent(&self, agent: AgentId) -> Option<HarvestSummary> {
        self.tracker.finalize(agent)
    }

    /// Run one tick: drain the queue, process every drained item, then
    /// sweep the batch tracker and deliver finalized summaries.
    ///
    /// Must be called exactly once per world tick from the tick-owning
    /// thread. A failure processing one item is logged and does not
    /// affect the remaining items in the same drain.
    pub fn tick<W: WorldAccess>(
        &self,
        world: &mut W,
        notifications: &mut dyn NotificationSink,
        counts: &mut dyn CountSink,
    ) -> TickReport {
        let (config, classifier) = self.current();
        let now_ms = self.clock.now_ms();
        let mut report = TickReport::default();

        for work in self.queue.drain() {
            match work {
                ScheduledWork::Harvest(request) => {
                    let broken = harvest::execute(
                        world,
                        &self.queue,
                        &self.tracker,
                        classifier.as_ref(),
                        &request,
                        config.harvest.effective_limit(),
                        now_ms,
                    );
                    report.harvests = report.harvests.saturating_add(1);
                    report.nodes_broken = report.nodes_broken.saturating_add(broken);
                }
                ScheduledWork::Collect(request) => {
                    report.collects = report.collects.saturating_add(1);
                    let outcome = {
                        let mut rng = self.lock_rng();
                        collect::collect(world, &request, &config.collect, &mut *rng)
                    };
                    match outcome {
                        Ok(outcome) => {
                            report.items_collected = report
                                .items_collected
                                .saturating_add(outcome.items_collected);
                            report.experience_granted = report
                                .experience_granted
                                .saturating_add(outcome.experience_granted);
                        }
                        Err(error) => {
                            warn!(
                                agent = %request.agent,
                                position = %request.position,
                                %error,
                                "collect request failed"
                            );
                        }
                    }
                }
            }
        }

        let summaries = self
            .tracker
            .sweep(self.clock.now_ms(), |agent| world.resolve_agent(agent));
        for summary in summaries {
            report.summaries = report.summaries.saturating_add(1);
            if config.harvest.log_notifications {
                notifications.notify_summary(&summary);
            }
            if let Err(error) = counts.send_count(summary.agent, summary.count) {
                if config.harvest.debug_logging {
                    debug!(agent = %summary.agent, %error, "harvested-count delivery failed");
                }
            }
        }

        report
    }

    /// Number of work items waiting for the next drain.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Number of agents with an in-progress batch.
    pub fn active_batches(&self) -> usize {
        self.tracker.active_batches()
    }

    /// The consistent (config, classifier) pair for one operation.
    fn current(&self) -> (Arc<VeinreapConfig>, Arc<dyn ResourceClassifier>) {
        let snapshot = self.lock_snapshot();
        (
            Arc::clone(&snapshot.config),
            Arc::clone(&snapshot.classifier),
        )
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for HarvestCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HarvestCoordinator")
            .field("queued", &self.queue.len())
            .field("active_batches", &self.tracker.active_batches())
            .finish_non_exhaustive()
    }
}
