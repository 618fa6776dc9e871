//! Cluster discovery, deferred scheduling, and batch tracking for vein
//! harvesting.
//!
//! When an agent breaks a harvestable node while holding the activation
//! input, this crate discovers the connected vein, removes it over the
//! following ticks, routes drops into the agent's inventory, optionally
//! converts whitelisted drops into directly-granted experience, and
//! reports one batched summary instead of a message per node.
//!
//! All world mutation happens on the tick thread: trigger events from
//! other contexts only ever push onto the [`ActionQueue`], which the
//! [`HarvestCoordinator`] drains once per tick.
//!
//! # Modules
//!
//! - [`classify`] -- [`ResourceClassifier`] and the ordered-strategy
//!   canonical implementation
//! - [`cluster`] -- bounded breadth-first vein discovery
//! - [`hold`] -- per-agent activation hold state with release grace
//! - [`queue`] -- the deferred action queue and its work items
//! - [`harvest`] -- the harvest executor
//! - [`collect`] -- drop and experience collection
//! - [`tracker`] -- debounced batch completion tracking
//! - [`coordinator`] -- [`HarvestCoordinator`], the single owner of all
//!   multi-context state
//! - [`config`] -- YAML configuration loading
//! - [`clock`] -- millisecond [`TimeSource`] abstraction
//! - [`notify`] -- outbound summary and count sinks
//! - [`error`] -- [`CoreError`] and the failure taxonomy
//!
//! [`ActionQueue`]: queue::ActionQueue
//! [`ResourceClassifier`]: classify::ResourceClassifier
//! [`TimeSource`]: clock::TimeSource

pub mod classify;
pub mod clock;
pub mod cluster;
pub mod collect;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod harvest;
pub mod hold;
pub mod notify;
pub mod queue;
pub mod tracker;

pub use classify::{ResourceClassifier, StrategyClassifier};
pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use config::{ConfigError, VeinreapConfig};
pub use coordinator::{HarvestCoordinator, TickReport};
pub use error::CoreError;
pub use hold::HoldRegistry;
pub use notify::{CountSink, LogNotificationSink, NotificationSink, NullCountSink, SinkError};
pub use queue::{ActionQueue, CollectRequest, HarvestRequest, ScheduledWork};
pub use tracker::BatchTracker;
