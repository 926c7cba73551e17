//! trendcast - Real-Time Trend Broadcast Engine
//!
//! A process that periodically mutates a shared collection of trend records
//! and fans the resulting changes, plus derived notifications, out to every
//! connected WebSocket subscriber.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`store`] - Trend repository (in-memory, single-writer)
//! - [`classifier`] - Derived-event detection over mutated batches
//! - [`broadcast`] - Outbound messages, connection registry, fan-out hub
//! - [`scheduler`] - The three periodic ticks driving the engine
//! - [`server`] - Axum HTTP/WebSocket surface
//! - [`summarizer`] - AI summary collaborator boundary
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trendcast::config::Config;
//! use trendcast::server::BroadcastServer;
//! use trendcast::store::{seed, InMemoryTrendStore, TrendStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn TrendStore> = Arc::new(InMemoryTrendStore::new());
//!     seed::seed_store(store.as_ref(), seed::default_drafts()).await?;
//!
//!     let server = BroadcastServer::new(Config::default(), store)?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod classifier;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod store;
pub mod summarizer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::broadcast::{BroadcastHub, ConnectionRegistry, OutboundMessage};
    pub use crate::classifier::EventClassifier;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{Growth, Trend, TrendCategory, TrendDraft, TrendPrediction};
    pub use crate::scheduler::TickScheduler;
    pub use crate::store::{InMemoryTrendStore, TrendStore};
}

// Direct re-exports for convenience
pub use models::{Growth, Trend, TrendCategory, TrendDraft, TrendPrediction};
