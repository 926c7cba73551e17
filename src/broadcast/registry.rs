//! Connection registry for live subscribers
//!
//! Tracks every open subscriber connection. Each connection owns a bounded
//! mpsc channel; the receiver side is driven by that connection's WebSocket
//! writer task, the sender side stays here for broadcasts. The registry is
//! the sole owner of connection handles — no other component keeps one
//! across ticks.
//!
//! The set is mutated from two directions (client-initiated close and
//! broadcast-time pruning); both go through the same lock and removal is
//! idempotent, so interleavings cannot corrupt the set.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Opaque identifier for one subscriber connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    fn generate() -> Self {
        Self(format!("conn_{}", Uuid::new_v4()))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Send half of one subscriber connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub tx: mpsc::Sender<String>,
    pub connected_at: DateTime<Utc>,
}

/// Registry of all live subscriber connections
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    send_queue_capacity: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry; `send_queue_capacity` bounds each
    /// connection's outbound queue
    pub fn new(send_queue_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            send_queue_capacity,
        }
    }

    /// Add a newly-accepted subscriber; returns its id and the receiver
    /// the connection's writer task drains
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(self.send_queue_capacity);
        let handle = ConnectionHandle {
            id: id.clone(),
            tx,
            connected_at: Utc::now(),
        };

        let mut connections = self.connections.write().await;
        connections.insert(id.clone(), handle);
        tracing::debug!(connection_id = %id, total = connections.len(), "subscriber registered");

        (id, rx)
    }

    /// Remove a connection; idempotent, returns whether it was present
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(connection_id = %id, "subscriber unregistered");
        }
        removed
    }

    /// Current snapshot of send handles, taken under the read lock so a
    /// broadcast pass works against a consistent set
    pub async fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Number of live connections
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}
