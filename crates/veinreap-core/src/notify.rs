//! Outbound sinks: batch summaries to the agent and the harvested-count
//! integer to the activation transport.
//!
//! Delivery is fire-and-forget. A failed send is logged (at debug level
//! when debug logging is enabled) and never retried; tracker state stays
//! locally authoritative regardless of delivery.

use tracing::info;
use veinreap_types::{AgentId, HarvestSummary};

/// Errors from outbound delivery.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The transport could not deliver the payload.
    #[error("transport unavailable: {reason}")]
    TransportUnavailable {
        /// What the transport reported.
        reason: String,
    },
}

/// Receives the one-per-batch summary addressed to the agent.
pub trait NotificationSink {
    /// Deliver a finalized batch summary.
    fn notify_summary(&mut self, summary: &HarvestSummary);
}

/// Receives the harvested-count integer for client-side display.
pub trait CountSink {
    /// Deliver the count for one finalized batch.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::TransportUnavailable`] if delivery failed;
    /// the caller logs and moves on.
    fn send_count(&mut self, agent: AgentId, count: u32) -> Result<(), SinkError>;
}

/// A notification sink that writes summaries to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify_summary(&mut self, summary: &HarvestSummary) {
        info!(
            agent = %summary.agent,
            node_type = summary.node_type.as_ref().map(veinreap_types::NodeType::as_str),
            count = summary.count,
            "vein harvest complete"
        );
    }
}

/// A count sink that discards every payload. Used when no client-side
/// display is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCountSink;

impl CountSink for NullCountSink {
    fn send_count(&mut self, _agent: AgentId, _count: u32) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that records everything it receives. Test aid.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Summaries received, in delivery order.
    pub summaries: Vec<HarvestSummary>,
    /// Counts received, in delivery order.
    pub counts: Vec<(AgentId, u32)>,
}

impl NotificationSink for RecordingSink {
    fn notify_summary(&mut self, summary: &HarvestSummary) {
        self.summaries.push(summary.clone());
    }
}

impl CountSink for RecordingSink {
    fn send_count(&mut self, agent: AgentId, count: u32) -> Result<(), SinkError> {
        self.counts.push((agent, count));
        Ok(())
    }
}
