//! Per-agent activation hold state with a release grace window.
//!
//! The activation transport delivers "set holding" messages from the
//! client. Between the client releasing the input and that message
//! arriving, break events can still be checked; the grace window keeps
//! `is_holding` true for a short interval after the last "pressed"
//! message so those in-flight checks are not lost.
//!
//! An entry that is never refreshed expires after the same window: the
//! transport refreshes the timestamp on every pressed transition, so a
//! stale timestamp means the hold ended and the release message was
//! lost. Expired entries are cleared lazily on query.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use veinreap_types::AgentId;

/// The recorded hold state of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HoldState {
    /// Whether the last transport message was "pressed".
    active: bool,
    /// Timestamp of the most recent "pressed" message, in milliseconds.
    last_set_ms: u64,
}

/// Registry of which agents currently hold the activation input.
///
/// Internally synchronized; the transport writes from its own delivery
/// context while the tick thread queries during trigger handling.
#[derive(Debug)]
pub struct HoldRegistry {
    grace_ms: u64,
    states: Mutex<BTreeMap<AgentId, HoldState>>,
}

impl HoldRegistry {
    /// Create a registry with the given grace window in milliseconds.
    pub const fn new(grace_ms: u64) -> Self {
        Self {
            grace_ms,
            states: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record a transport "set holding" message.
    ///
    /// A pressed transition creates or refreshes the entry's timestamp; a
    /// release keeps the timestamp so the grace window can still honor
    /// checks that raced the release message.
    pub fn set_holding(&self, agent: AgentId, active: bool, now_ms: u64) {
        let mut states = self.lock();
        if active {
            states.insert(
                agent,
                HoldState {
                    active: true,
                    last_set_ms: now_ms,
                },
            );
        } else if let Some(state) = states.get_mut(&agent) {
            state.active = false;
        }
    }

    /// Whether the agent's activation input counts as held at `now_ms`.
    ///
    /// True while the entry is active and fresh, and for up to the grace
    /// window after the last pressed message even if a release has
    /// arrived. Entries past the grace window are removed.
    pub fn is_holding(&self, agent: AgentId, now_ms: u64) -> bool {
        let mut states = self.lock();
        let Some(state) = states.get(&agent).copied() else {
            return false;
        };

        let within_grace = now_ms.saturating_sub(state.last_set_ms) < self.grace_ms;
        if state.active && within_grace {
            return true;
        }
        if !within_grace {
            states.remove(&agent);
            return false;
        }
        // Released, but the last press is still inside the grace window.
        true
    }

    /// Number of tracked entries, expired ones included. Test aid.
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<AgentId, HoldState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
