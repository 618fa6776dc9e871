//! The deferred action queue: work items produced anywhere, drained on
//! the tick thread.
//!
//! Trigger events arrive on contexts where mutating world or inventory
//! state is unsafe (network I/O threads firing mid-tick). All such work
//! is pushed onto this queue and drained exactly once per world tick by
//! the tick-owning thread, so every mutation happens on the single
//! authoritative thread without locking world state.
//!
//! Draining swaps the queued items out under the lock and hands them
//! back as a batch; anything pushed while the batch is being processed
//! lands in the *next* drain. A collect request produced while executing
//! a harvest request therefore runs on a later tick than its producer.
//!
//! Requests do not carry a world handle; the tick caller supplies the
//! world when it processes the drained batch, which keeps exclusive
//! mutable access on the tick thread by construction.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use veinreap_types::{AgentId, BlockPos, NodeState, NodeType, ToolSnapshot};

/// A request to vein-harvest around a broken node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestRequest {
    /// The cell of the originally-broken node.
    pub position: BlockPos,
    /// The agent that broke it.
    pub agent: AgentId,
    /// The node state observed when the trigger fired. Execution
    /// re-checks the live cell against this and no-ops if it changed.
    pub origin: NodeState,
    /// Whether to run cluster discovery. False degrades to a stale-check
    /// no-op, used when the effective limit leaves no room for extras.
    pub cluster_search: bool,
    /// Equipment copy captured at enqueue time; owned by this request.
    pub tool: Option<ToolSnapshot>,
}

/// A request to collect drops and experience at a harvested cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectRequest {
    /// The cell that was harvested.
    pub position: BlockPos,
    /// The agent receiving drops and experience.
    pub agent: AgentId,
    /// The harvested node's type, for the experience whitelist.
    pub node_type: NodeType,
    /// Equipment copy captured when the harvest was scheduled.
    pub tool: Option<ToolSnapshot>,
}

/// One unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledWork {
    /// Run the harvest executor for a trigger event.
    Harvest(HarvestRequest),
    /// Run the drop/experience collector for one harvested cell.
    Collect(CollectRequest),
}

/// A concurrency-safe, unbounded FIFO of [`ScheduledWork`].
///
/// `push` is safe from any thread and never fails; `drain` must be
/// called exactly once per world tick from the tick-owning thread.
#[derive(Debug, Default)]
pub struct ActionQueue {
    items: Mutex<VecDeque<ScheduledWork>>,
}

impl ActionQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a work item. Non-blocking, callable from any thread.
    pub fn push(&self, work: ScheduledWork) {
        self.lock().push_back(work);
    }

    /// Take everything currently queued, in FIFO order.
    ///
    /// Items pushed after this call (including by the caller while
    /// processing the returned batch) are left for the next drain.
    pub fn drain(&self) -> Vec<ScheduledWork> {
        let mut items = self.lock();
        let batch = core::mem::take(&mut *items);
        batch.into_iter().collect()
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Lock the inner deque, recovering from poisoning.
    ///
    /// A poisoned lock means a panic already aborted some other work
    /// item mid-push; the deque itself is still structurally sound.
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ScheduledWork>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use veinreap_types::NodeType;

    use super::*;

    fn collect_at(x: i32) -> ScheduledWork {
        ScheduledWork::Collect(CollectRequest {
            position: BlockPos::new(x, 0, 0),
            agent: AgentId::new(),
            node_type: NodeType::from("ore/coal"),
            tool: None,
        })
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let queue = ActionQueue::new();
        queue.push(collect_at(1));
        queue.push(collect_at(2));
        queue.push(collect_at(3));

        let batch = queue.drain();
        let xs: Vec<i32> = batch
            .iter()
            .map(|w| match w {
                ScheduledWork::Collect(c) => c.position.x,
                ScheduledWork::Harvest(h) => h.position.x,
            })
            .collect();
        assert_eq!(xs, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn items_pushed_during_processing_wait_for_next_drain() {
        let queue = ActionQueue::new();
        queue.push(collect_at(1));

        let batch = queue.drain();
        assert_eq!(batch.len(), 1);

        // Simulates a harvest producing a collect request mid-batch.
        queue.push(collect_at(2));
        assert!(queue.drain().len() == 1);
    }

    #[test]
    fn push_from_other_threads_is_visible() {
        let queue = std::sync::Arc::new(ActionQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|x| {
                let queue = std::sync::Arc::clone(&queue);
                std::thread::spawn(move || queue.push(collect_at(x)))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
        assert_eq!(queue.drain().len(), 4);
    }
}
