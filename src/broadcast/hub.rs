//! Broadcast hub
//!
//! Serializes each outbound message once, then offers it to every live
//! connection with a non-blocking send. Per-connection failures stay per
//! connection: a full queue drops that copy of the message, a closed
//! channel gets the connection pruned, and the rest of the pass continues
//! either way. Nothing here is surfaced to the broadcasting caller.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use crate::metrics;

use super::message::OutboundMessage;
use super::registry::{ConnectionId, ConnectionRegistry};

/// What happened during one broadcast pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections the message was offered to
    pub attempted: usize,

    /// Copies accepted into a connection's queue
    pub delivered: usize,

    /// Copies dropped because a queue was full
    pub dropped: usize,

    /// Connections removed because their channel was closed
    pub pruned: usize,
}

/// Delivers serialized messages through the [`ConnectionRegistry`]
pub struct BroadcastHub {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this hub delivers through
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Serialize `message` once and offer it to every live connection.
    ///
    /// FIFO per connection is inherited from the mpsc channel; ordering
    /// across different subscribers is not guaranteed.
    pub async fn broadcast(&self, message: &OutboundMessage) -> BroadcastOutcome {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    message_type = message.message_type(),
                    error = %e,
                    "failed to serialize outbound message"
                );
                return BroadcastOutcome::default();
            }
        };

        let mut outcome = BroadcastOutcome::default();
        let mut dead: Vec<ConnectionId> = Vec::new();

        for handle in self.registry.snapshot().await {
            outcome.attempted += 1;
            match handle.tx.try_send(payload.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.dropped += 1;
                    metrics::inc_delivery_failure();
                    tracing::warn!(
                        connection_id = %handle.id,
                        message_type = message.message_type(),
                        "send queue full, dropping message for subscriber"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    dead.push(handle.id);
                }
            }
        }

        for id in dead {
            if self.registry.unregister(&id).await {
                outcome.pruned += 1;
                metrics::inc_delivery_failure();
                tracing::info!(connection_id = %id, "pruned closed subscriber during broadcast");
            }
        }

        metrics::inc_broadcast(message.message_type());
        metrics::set_connected_clients(self.registry.count().await);

        tracing::debug!(
            message_type = message.message_type(),
            attempted = outcome.attempted,
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            pruned = outcome.pruned,
            "broadcast pass complete"
        );

        outcome
    }
}
