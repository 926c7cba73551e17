//! Trend repository abstractions
//!
//! This module provides trait-based repository abstractions to decouple the
//! scheduler and broadcast logic from storage implementations, enabling:
//! - Easy testing with throwaway in-memory stores
//! - Swappable storage backends without touching the tick/broadcast code
//! - A single, visible place for the write-path invariants
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            Scheduler / Server / Hub             │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌─────────────────────────────────────────────────┐
//! │               TrendStore trait                  │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌─────────────────────────────────────────────────┐
//! │   InMemoryTrendStore (RwLock single-writer)     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Invariants enforced at every write path:
//! - `searches` never falls below [`crate::models::SEARCH_FLOOR`]
//! - `growth` is clamped to the [-50, +500] percent range before the
//!   signed percent string is formed

mod memory;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Trend, TrendCategory, TrendDraft, TrendId, TrendUpdate};

pub use memory::InMemoryTrendStore;

/// Errors surfaced by trend stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("trend not found: {0}")]
    NotFound(TrendId),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository of trend records.
///
/// Writes are serialized by the implementation (single-writer discipline);
/// reads observe a consistent snapshot, never a partially-updated record.
#[async_trait]
pub trait TrendStore: Send + Sync {
    /// All active trends, in stable id order
    async fn list(&self) -> StoreResult<Vec<Trend>>;

    /// Active trends in one category
    async fn list_by_category(&self, category: TrendCategory) -> StoreResult<Vec<Trend>>;

    /// Active trends tagged with one region
    async fn list_by_region(&self, region: &str) -> StoreResult<Vec<Trend>>;

    /// Look up one trend (active or not)
    async fn get(&self, id: TrendId) -> StoreResult<Trend>;

    /// Allocate the next id, apply creation defaults, store, and return
    /// the stored record
    async fn create(&self, draft: TrendDraft) -> StoreResult<Trend>;

    /// Apply a partial mutation atomically and return the new value
    async fn update(&self, id: TrendId, change: TrendUpdate) -> StoreResult<Trend>;

    /// Number of active trends
    async fn count(&self) -> StoreResult<usize>;
}
