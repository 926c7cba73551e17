//! Fan-out messaging to subscriber connections
//!
//! This module owns everything between "a message exists" and "every live
//! subscriber has been offered it":
//!
//! - [`message`] - the outbound envelope shared by all message types
//! - [`registry`] - the set of live connections and their send handles
//! - [`hub`] - serialize-once broadcast with per-connection failure isolation
//!
//! # Architecture
//!
//! ```text
//! Scheduler ticks ──┐
//!                   ▼
//!          ┌─────────────────┐     serialize once
//!          │  BroadcastHub   │ ─────────────────────┐
//!          └─────────────────┘                      │
//!                   │                               ▼
//!          ┌─────────────────────┐        try_send per connection
//!          │ ConnectionRegistry  │ ──► conn_a ──► WebSocket writer
//!          │  (RwLock<HashMap>)  │ ──► conn_b ──► WebSocket writer
//!          └─────────────────────┘ ──► conn_c ──► (closed → pruned)
//! ```
//!
//! A broken subscriber never disturbs the others: sends are non-blocking,
//! closed channels are pruned after the pass, and nothing propagates back
//! to the broadcasting tick.

pub mod hub;
pub mod message;
pub mod registry;

pub use hub::{BroadcastHub, BroadcastOutcome};
pub use message::{ActivityEvent, OutboundMessage, TrendMetrics};
pub use registry::{ConnectionId, ConnectionRegistry};
