//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `veinreap.yaml`. This module
//! defines strongly-typed structs mirroring the YAML structure and a
//! loader that reads the file. The loaded value is treated as a read-only
//! snapshot: a reload produces a fresh [`VeinreapConfig`] that replaces
//! the previous one wholesale, never a partial mutation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level harvest-core configuration.
///
/// Mirrors the structure of `veinreap.yaml`. All fields have defaults
/// matching the recommended values, so an empty file (or no file) yields
/// a working configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VeinreapConfig {
    /// Cluster harvesting limits and toggles.
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Grace-window and debounce timings.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Drop and experience collection parameters.
    #[serde(default)]
    pub collect: CollectConfig,

    /// Resource classifier strategy inputs.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl VeinreapConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Cluster harvesting limits and toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Maximum nodes per vein operation, including the trigger node.
    pub max_cluster_size: u32,
    /// Hard upper bound on `max_cluster_size`; the effective limit is the
    /// minimum of the two.
    pub max_cluster_size_cap: u32,
    /// Master toggle for the whole auto-collect feature.
    pub auto_collect_enabled: bool,
    /// Whether finalized batch summaries are delivered to the agent.
    pub log_notifications: bool,
    /// Whether transport failures and stale requests are logged at debug.
    pub debug_logging: bool,
}

impl HarvestConfig {
    /// The effective cluster limit: `min(max_cluster_size, cap)`.
    pub const fn effective_limit(&self) -> u32 {
        if self.max_cluster_size < self.max_cluster_size_cap {
            self.max_cluster_size
        } else {
            self.max_cluster_size_cap
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_cluster_size: 64,
            max_cluster_size_cap: 128,
            auto_collect_enabled: true,
            log_notifications: true,
            debug_logging: false,
        }
    }
}

/// Grace-window and debounce timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long after the last "pressed" message the activation input
    /// still counts as held. Absorbs input-event delivery latency.
    pub hold_grace_ms: u64,
    /// How long an agent's batch counter may sit idle before the sweep
    /// finalizes it and emits the summary.
    pub batch_inactivity_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hold_grace_ms: 700,
            batch_inactivity_ms: 300,
        }
    }
}

/// An inclusive experience range granted per harvested node of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExperienceRange {
    /// Minimum experience points.
    pub min: u32,
    /// Maximum experience points (inclusive).
    pub max: u32,
}

/// Drop and experience collection parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    /// Radius around a harvested cell scanned for loose item drops.
    pub item_radius: f64,
    /// Radius scanned for experience orbs to suppress when a type is on
    /// the experience whitelist.
    pub orb_radius: f64,
    /// Experience whitelist: node-type name to the inclusive range granted
    /// directly per node. Types absent from this map grant nothing and
    /// their orbs are left untouched.
    pub experience_ranges: BTreeMap<String, ExperienceRange>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        let mut experience_ranges = BTreeMap::new();
        experience_ranges.insert("ore/coal".to_owned(), ExperienceRange { min: 0, max: 2 });
        experience_ranges.insert("ore/lapis".to_owned(), ExperienceRange { min: 2, max: 5 });
        experience_ranges.insert("ore/redstone".to_owned(), ExperienceRange { min: 1, max: 5 });
        experience_ranges.insert("ore/quartz".to_owned(), ExperienceRange { min: 2, max: 5 });
        experience_ranges.insert("ore/diamond".to_owned(), ExperienceRange { min: 3, max: 7 });
        experience_ranges.insert("ore/emerald".to_owned(), ExperienceRange { min: 3, max: 7 });
        Self {
            item_radius: 1.5,
            orb_radius: 2.5,
            experience_ranges,
        }
    }
}

/// Resource classifier strategy inputs.
///
/// The classifier tries exact type names first, then name markers, then
/// the free-form whitelist; the first strategy to accept wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Node types that are always harvestable, matched exactly.
    pub exact_types: Vec<String>,
    /// Substrings that mark a type name as harvestable, e.g. `"ore/"`.
    pub name_markers: Vec<String>,
    /// Operator-configured extra types, matched exactly. Kept separate
    /// from `exact_types` so operators can extend coverage without
    /// touching the built-in list.
    pub whitelist: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            exact_types: vec![
                "ore/coal".to_owned(),
                "ore/iron".to_owned(),
                "ore/copper".to_owned(),
                "ore/gold".to_owned(),
                "ore/lapis".to_owned(),
                "ore/redstone".to_owned(),
                "ore/quartz".to_owned(),
                "ore/diamond".to_owned(),
                "ore/emerald".to_owned(),
            ],
            name_markers: vec!["ore/".to_owned(), "_ore".to_owned()],
            whitelist: Vec::new(),
        }
    }
}
