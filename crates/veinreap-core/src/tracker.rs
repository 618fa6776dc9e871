//! Debounced batch completion tracking.
//!
//! Cluster harvesting and the follow-up collection work are staggered
//! across ticks, so there is no natural "operation complete" event.
//! Instead, each harvested node increments a per-agent counter, and a
//! once-per-tick sweep finalizes any counter that has sat idle past the
//! inactivity threshold, emitting one [`HarvestSummary`] in place of the
//! many per-node messages.
//!
//! Per-agent state machine: absent -> active -> absent (cyclic). The
//! counter is created on the first increment, refreshed on each
//! subsequent one, and removed at finalize or sweep.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use veinreap_types::{AgentId, HarvestSummary, NodeType};

/// One agent's in-progress batch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchCounter {
    /// Nodes harvested since the batch started.
    count: u32,
    /// The first node type seen; used to label the summary. Not
    /// overwritten by later increments even if types were mixed.
    first_type: Option<NodeType>,
    /// Timestamp of the most recent increment. Monotonically
    /// non-decreasing while the counter exists.
    last_action_ms: u64,
}

/// Tracks per-agent harvest batches and finalizes them on inactivity.
///
/// Internally synchronized: increments arrive from the tick thread, but
/// explicit finalize calls may come from other contexts (e.g. an agent
/// disconnect handler).
#[derive(Debug)]
pub struct BatchTracker {
    inactivity_ms: u64,
    counters: Mutex<BTreeMap<AgentId, BatchCounter>>,
}

impl BatchTracker {
    /// Create a tracker with the given inactivity threshold in
    /// milliseconds.
    pub const fn new(inactivity_ms: u64) -> Self {
        Self {
            inactivity_ms,
            counters: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one harvested node for the agent.
    ///
    /// Creates the counter if absent; otherwise bumps the count and
    /// refreshes the activity timestamp.
    pub fn increment(&self, agent: AgentId, node_type: &NodeType, now_ms: u64) {
        let mut counters = self.lock();
        match counters.get_mut(&agent) {
            Some(counter) => {
                counter.count = counter.count.saturating_add(1);
                // Keep the timestamp non-decreasing even if the caller's
                // clock readings interleave oddly.
                counter.last_action_ms = counter.last_action_ms.max(now_ms);
            }
            None => {
                counters.insert(
                    agent,
                    BatchCounter {
                        count: 1,
                        first_type: Some(node_type.clone()),
                        last_action_ms: now_ms,
                    },
                );
            }
        }
    }

    /// Immediately finalize the agent's batch, returning its summary.
    ///
    /// Returns `None` (a no-op) if the agent has no active batch.
    pub fn finalize(&self, agent: AgentId) -> Option<HarvestSummary> {
        let counter = self.lock().remove(&agent)?;
        Some(HarvestSummary {
            agent,
            node_type: counter.first_type,
            count: counter.count,
        })
    }

    /// Finalize every batch idle for at least the inactivity threshold.
    ///
    /// `resolve` reports whether an agent can still be reached; summaries
    /// for unresolvable agents are dropped (their batches are still
    /// removed). Called once per tick from the tick thread.
    pub fn sweep(&self, now_ms: u64, mut resolve: impl FnMut(AgentId) -> bool) -> Vec<HarvestSummary> {
        let expired: Vec<(AgentId, BatchCounter)> = {
            let mut counters = self.lock();
            let idle: Vec<AgentId> = counters
                .iter()
                .filter(|(_, c)| now_ms.saturating_sub(c.last_action_ms) >= self.inactivity_ms)
                .map(|(&agent, _)| agent)
                .collect();
            idle.into_iter()
                .filter_map(|agent| counters.remove(&agent).map(|c| (agent, c)))
                .collect()
        };

        let mut summaries = Vec::new();
        for (agent, counter) in expired {
            if resolve(agent) {
                summaries.push(HarvestSummary {
                    agent,
                    node_type: counter.first_type,
                    count: counter.count,
                });
            } else {
                debug!(%agent, count = counter.count, "dropping summary for unresolvable agent");
            }
        }
        summaries
    }

    /// Number of agents with an active batch.
    pub fn active_batches(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<AgentId, BatchCounter>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coal() -> NodeType {
        NodeType::from("ore/coal")
    }

    #[test]
    fn count_equals_number_of_increments() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        for i in 0..7u64 {
            tracker.increment(agent, &coal(), i.saturating_mul(10));
        }
        let summary = tracker.finalize(agent);
        assert_eq!(summary.map(|s| s.count), Some(7));
        assert_eq!(tracker.active_batches(), 0);
    }

    #[test]
    fn first_type_is_not_overwritten() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        tracker.increment(agent, &coal(), 0);
        tracker.increment(agent, &NodeType::from("ore/iron"), 10);
        let summary = tracker.finalize(agent);
        assert_eq!(summary.and_then(|s| s.node_type), Some(coal()));
    }

    #[test]
    fn finalize_absent_agent_is_a_no_op() {
        let tracker = BatchTracker::new(300);
        assert!(tracker.finalize(AgentId::new()).is_none());
    }

    #[test]
    fn sweep_finalizes_only_idle_batches() {
        let tracker = BatchTracker::new(300);
        let idle = AgentId::new();
        let busy = AgentId::new();
        tracker.increment(idle, &coal(), 0);
        tracker.increment(busy, &coal(), 350);

        let summaries = tracker.sweep(400, |_| true);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries.first().map(|s| s.agent), Some(idle));
        assert_eq!(tracker.active_batches(), 1);
    }

    #[test]
    fn sweep_at_exact_threshold_finalizes() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        tracker.increment(agent, &coal(), 100);
        let summaries = tracker.sweep(400, |_| true);
        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn unresolvable_agent_summary_is_dropped() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        tracker.increment(agent, &coal(), 0);
        let summaries = tracker.sweep(1_000, |_| false);
        assert!(summaries.is_empty());
        // The batch is still cleared.
        assert_eq!(tracker.active_batches(), 0);
    }

    #[test]
    fn increments_restart_after_sweep() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        tracker.increment(agent, &coal(), 0);
        let _ = tracker.sweep(500, |_| true);

        tracker.increment(agent, &coal(), 600);
        let summary = tracker.finalize(agent);
        assert_eq!(summary.map(|s| s.count), Some(1));
    }

    #[test]
    fn timestamp_never_goes_backwards() {
        let tracker = BatchTracker::new(300);
        let agent = AgentId::new();
        tracker.increment(agent, &coal(), 500);
        // An out-of-order clock reading must not rewind the batch.
        tracker.increment(agent, &coal(), 400);
        // Idle threshold measured from 500, so sweep at 700 is too early.
        assert!(tracker.sweep(700, |_| true).is_empty());
        assert_eq!(tracker.sweep(800, |_| true).len(), 1);
    }
}
