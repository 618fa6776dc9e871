//! The batched harvest summary delivered once per finalized vein operation.

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;
use crate::node::NodeType;

/// Summary of one completed vein operation for one agent.
///
/// Emitted by the batch completion tracker when an agent's harvest
/// activity goes quiet, replacing the per-node messages the agent would
/// otherwise receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSummary {
    /// The agent the summary is addressed to.
    pub agent: AgentId,
    /// The first node type seen in the batch, used for labeling.
    ///
    /// `None` only if a batch was finalized without any recorded type,
    /// which does not happen through the normal increment path.
    pub node_type: Option<NodeType>,
    /// Number of nodes harvested in the batch.
    pub count: u32,
}
