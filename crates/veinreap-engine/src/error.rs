//! Error types for the demo engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the demo run.

/// Top-level error for the demo engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: veinreap_core::config::ConfigError,
    },

    /// World seeding or mutation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: veinreap_world::WorldError,
    },
}
