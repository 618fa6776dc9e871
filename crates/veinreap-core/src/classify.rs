//! Resource classification: deciding whether a node is harvestable.
//!
//! Classification is a single [`ResourceClassifier`] trait with one
//! canonical implementation, [`StrategyClassifier`], which runs an
//! ordered list of pure strategies -- exact built-in types, name-marker
//! substrings, then the operator whitelist -- and accepts on the first
//! positive result.

use std::collections::BTreeSet;

use veinreap_types::NodeState;

use crate::config::ClassifierConfig;

/// Decides whether a node instance is harvestable.
///
/// Implementations must be pure with respect to the node state: the same
/// state always classifies the same way until reconfiguration.
pub trait ResourceClassifier: Send + Sync {
    /// Whether the given node may be vein-harvested.
    fn is_harvestable(&self, state: &NodeState) -> bool;
}

/// One classification strategy: a name plus a pure predicate.
struct Strategy {
    /// Short name used when reporting which strategy matched.
    name: &'static str,
    /// The predicate over the node's type name.
    check: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

/// The canonical classifier: ordered strategies, first positive wins.
///
/// Strategy order is fixed: exact built-in types, then name markers,
/// then the operator whitelist. Later strategies only run when earlier
/// ones decline, so the cheap exact-match set answers the common case.
pub struct StrategyClassifier {
    strategies: Vec<Strategy>,
}

impl StrategyClassifier {
    /// Build the classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let exact: BTreeSet<String> = config.exact_types.iter().cloned().collect();
        let markers: Vec<String> = config.name_markers.clone();
        let whitelist: BTreeSet<String> = config.whitelist.iter().cloned().collect();

        let strategies = vec![
            Strategy {
                name: "exact",
                check: Box::new(move |name| exact.contains(name)),
            },
            Strategy {
                name: "name-marker",
                check: Box::new(move |name| markers.iter().any(|m| name.contains(m.as_str()))),
            },
            Strategy {
                name: "whitelist",
                check: Box::new(move |name| whitelist.contains(name)),
            },
        ];

        Self { strategies }
    }

    /// The name of the first strategy accepting this node, if any.
    pub fn matching_strategy(&self, state: &NodeState) -> Option<&'static str> {
        let name = state.node_type.as_str();
        self.strategies
            .iter()
            .find(|s| (s.check)(name))
            .map(|s| s.name)
    }
}

impl core::fmt::Debug for StrategyClassifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyClassifier")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResourceClassifier for StrategyClassifier {
    fn is_harvestable(&self, state: &NodeState) -> bool {
        self.matching_strategy(state).is_some()
    }
}

/// A classifier that accepts every node. Test seam only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ResourceClassifier for AcceptAll {
    fn is_harvestable(&self, _state: &NodeState) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use veinreap_types::NodeType;

    use super::*;

    fn state(name: &str) -> NodeState {
        NodeState::new(NodeType::from(name))
    }

    #[test]
    fn exact_type_matches_first() {
        let classifier = StrategyClassifier::from_config(&ClassifierConfig::default());
        assert_eq!(classifier.matching_strategy(&state("ore/coal")), Some("exact"));
    }

    #[test]
    fn name_marker_catches_unlisted_ores() {
        let classifier = StrategyClassifier::from_config(&ClassifierConfig::default());
        // Not in the exact list, but carries the "ore/" marker.
        assert_eq!(
            classifier.matching_strategy(&state("ore/tin")),
            Some("name-marker")
        );
        // Suffix marker form used by other content packs.
        assert_eq!(
            classifier.matching_strategy(&state("deepstone_ore")),
            Some("name-marker")
        );
    }

    #[test]
    fn whitelist_is_the_last_resort() {
        let config = ClassifierConfig {
            exact_types: Vec::new(),
            name_markers: Vec::new(),
            whitelist: vec!["crystal/amber".to_owned()],
        };
        let classifier = StrategyClassifier::from_config(&config);
        assert_eq!(
            classifier.matching_strategy(&state("crystal/amber")),
            Some("whitelist")
        );
        assert!(!classifier.is_harvestable(&state("crystal/ruby")));
    }

    #[test]
    fn plain_stone_is_not_harvestable() {
        let classifier = StrategyClassifier::from_config(&ClassifierConfig::default());
        assert!(!classifier.is_harvestable(&state("rock/stone")));
        assert!(!classifier.is_harvestable(&state("soil/dirt")));
    }
}
