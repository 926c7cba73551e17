//! In-memory trend store
//!
//! The authoritative trend set lives in a `BTreeMap` keyed by id, guarded
//! by a `tokio::sync::RwLock`. The write lock is held for the full
//! read-modify-write of an update, which gives the single-writer discipline
//! the scheduler relies on; list reads clone a snapshot under the read lock.

use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::models::{
    floor_searches, Growth, Trend, TrendCategory, TrendDraft, TrendId, TrendUpdate,
    FALLBACK_SUMMARY,
};

use super::{StoreError, StoreResult, TrendStore};

struct StoreInner {
    trends: BTreeMap<TrendId, Trend>,
    next_id: TrendId,
}

/// RwLock-guarded in-memory implementation of [`TrendStore`]
pub struct InMemoryTrendStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryTrendStore {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                trends: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTrendStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrendStore for InMemoryTrendStore {
    async fn list(&self) -> StoreResult<Vec<Trend>> {
        let inner = self.inner.read().await;
        Ok(inner
            .trends
            .values()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn list_by_category(&self, category: TrendCategory) -> StoreResult<Vec<Trend>> {
        let inner = self.inner.read().await;
        Ok(inner
            .trends
            .values()
            .filter(|t| t.is_active && t.category == category)
            .cloned()
            .collect())
    }

    async fn list_by_region(&self, region: &str) -> StoreResult<Vec<Trend>> {
        let inner = self.inner.read().await;
        Ok(inner
            .trends
            .values()
            .filter(|t| t.is_active && t.region.eq_ignore_ascii_case(region))
            .cloned()
            .collect())
    }

    async fn get(&self, id: TrendId) -> StoreResult<Trend> {
        let inner = self.inner.read().await;
        inner.trends.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, draft: TrendDraft) -> StoreResult<Trend> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let trend = Trend {
            id,
            title: draft.title,
            category: draft.category,
            region: draft.region,
            searches: floor_searches(draft.searches as i64),
            growth: Growth::new(draft.growth),
            countries: draft.countries,
            ai_summary: draft.ai_summary.unwrap_or_else(|| FALLBACK_SUMMARY.to_string()),
            prediction: draft.prediction,
            is_active: true,
            created_at: Utc::now(),
        };

        inner.trends.insert(id, trend.clone());
        tracing::debug!(trend_id = id, title = %trend.title, "trend created");
        Ok(trend)
    }

    async fn update(&self, id: TrendId, change: TrendUpdate) -> StoreResult<Trend> {
        let mut inner = self.inner.write().await;
        let trend = inner.trends.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(searches) = change.searches {
            trend.searches = floor_searches(searches);
        }
        if let Some(growth) = change.growth {
            trend.growth = Growth::new(growth);
        }
        if let Some(is_active) = change.is_active {
            trend.is_active = is_active;
        }
        if let Some(ai_summary) = change.ai_summary {
            trend.ai_summary = ai_summary;
        }

        Ok(trend.clone())
    }

    async fn count(&self) -> StoreResult<usize> {
        let inner = self.inner.read().await;
        Ok(inner.trends.values().filter(|t| t.is_active).count())
    }
}
