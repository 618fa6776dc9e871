//! Error types for the `veinreap-core` crate.
//!
//! Nothing in this crate is fatal to the process. The error taxonomy:
//!
//! - *Stale request* -- the world changed between scheduling and draining;
//!   recovered locally by no-opping the single request, never surfaced.
//! - *Partial cluster failure* -- one node's removal or drop emission
//!   failed; logged and skipped, the rest of the cluster proceeds.
//! - *Unresolvable agent* -- the agent disconnected before finalize;
//!   its summary is silently dropped.
//! - *Transport unavailable* -- outbound delivery failed; logged when
//!   debug logging is enabled, never retried.
//!
//! The first three are handled inline where they occur and do not appear
//! as variants here; [`CoreError`] carries only the failures a caller can
//! observe from a single work item.

use veinreap_world::WorldError;

/// Errors that can surface from processing one scheduled work item.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A world or inventory operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
