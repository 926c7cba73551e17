//! Outbound message envelope
//!
//! One envelope shape for every message type, discriminated by `type`:
//!
//! ```json
//! { "type": "trendsUpdate", "timestamp": "2026-01-15T09:30:00Z", "data": [...] }
//! ```
//!
//! Messages are immutable values; constructors stamp the timestamp at
//! creation and the hub serializes each message exactly once per broadcast.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Trend, TrendCategory};

/// Aggregate numbers pushed on every metrics tick
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetrics {
    /// Sum of `searches` across active trends
    pub total_searches: u64,

    /// Simulated concurrent-user estimate
    pub active_users: u32,

    /// Count of trends with growth above 50%
    pub trending_now: usize,
}

/// Human-readable activity notice, optionally tagged with a trend's
/// category and region
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TrendCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Envelope delivered to every subscriber
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    #[serde(rename_all = "camelCase")]
    TrendsUpdate {
        timestamp: DateTime<Utc>,
        data: Vec<Trend>,
    },

    #[serde(rename_all = "camelCase")]
    MetricsUpdate {
        timestamp: DateTime<Utc>,
        data: TrendMetrics,
    },

    #[serde(rename_all = "camelCase")]
    ActivityUpdate {
        timestamp: DateTime<Utc>,
        activity: ActivityEvent,
    },

    #[serde(rename_all = "camelCase")]
    TrendSurge {
        timestamp: DateTime<Utc>,
        trend: Trend,
        message: String,
    },

    #[serde(rename_all = "camelCase")]
    NewTrend {
        timestamp: DateTime<Utc>,
        trend: Trend,
        message: String,
    },
}

impl OutboundMessage {
    /// Full mutated batch from a refresh tick
    pub fn trends_update(data: Vec<Trend>) -> Self {
        Self::TrendsUpdate {
            timestamp: Utc::now(),
            data,
        }
    }

    /// Aggregates from a metrics tick
    pub fn metrics_update(data: TrendMetrics) -> Self {
        Self::MetricsUpdate {
            timestamp: Utc::now(),
            data,
        }
    }

    /// Ambient activity notice
    pub fn activity_update(activity: ActivityEvent) -> Self {
        Self::ActivityUpdate {
            timestamp: Utc::now(),
            activity,
        }
    }

    /// Surge notification for a trend whose growth crossed the threshold
    pub fn trend_surge(trend: Trend) -> Self {
        let message = format!(
            "{} is experiencing a surge with {} growth!",
            trend.title, trend.growth
        );
        Self::TrendSurge {
            timestamp: Utc::now(),
            trend,
            message,
        }
    }

    /// Announcement for a freshly created trend
    pub fn new_trend(trend: Trend) -> Self {
        let message = format!("Now tracking new trend: {}", trend.title);
        Self::NewTrend {
            timestamp: Utc::now(),
            trend,
            message,
        }
    }

    /// Wire discriminator, also used as a metrics label
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::TrendsUpdate { .. } => "trendsUpdate",
            Self::MetricsUpdate { .. } => "metricsUpdate",
            Self::ActivityUpdate { .. } => "activityUpdate",
            Self::TrendSurge { .. } => "trendSurge",
            Self::NewTrend { .. } => "newTrend",
        }
    }
}
