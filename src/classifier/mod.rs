//! Derived-event classification
//!
//! Given the batch of trends mutated by one refresh tick, derive the
//! notable events worth pushing on their own:
//!
//! - **Surge detection**: growth strictly above the surge threshold
//!   (+150% by default) produces a `trendSurge` message naming the trend.
//! - **Ad-hoc activity**: independently, each trend in the batch has a
//!   fixed probability (30% by default) of producing an `activityUpdate`
//!   describing its search volume, tagged with category and region.
//!
//! Classification is purely derivative: it never writes to the store and
//! its only output is messages for the hub. The random source is injected
//! so tests can pin the probabilistic branch.

use rand::Rng;

use crate::broadcast::message::{ActivityEvent, OutboundMessage};
use crate::models::Trend;

/// Thresholds for derived-event detection
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Growth percent a trend must strictly exceed to count as a surge
    pub surge_threshold: f64,

    /// Per-trend, per-batch probability of an ad-hoc activity message
    pub activity_probability: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            surge_threshold: 150.0,
            activity_probability: 0.3,
        }
    }
}

/// Derives notable events from a mutated trend batch
#[derive(Debug, Clone, Copy, Default)]
pub struct EventClassifier {
    config: ClassifierConfig,
}

impl EventClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one post-mutation batch into derived messages.
    ///
    /// The threshold is strict: a trend at exactly the surge threshold
    /// does not surge.
    pub fn classify<R: Rng>(&self, batch: &[Trend], rng: &mut R) -> Vec<OutboundMessage> {
        let mut derived = Vec::new();

        for trend in batch {
            if trend.growth.exceeds(self.config.surge_threshold) {
                tracing::info!(
                    trend_id = trend.id,
                    title = %trend.title,
                    growth = %trend.growth,
                    "surge detected"
                );
                derived.push(OutboundMessage::trend_surge(trend.clone()));
            }

            if rng.gen_bool(self.config.activity_probability) {
                derived.push(OutboundMessage::activity_update(ActivityEvent {
                    message: format!(
                        "'{}' drew {} searches in the latest refresh",
                        trend.title, trend.searches
                    ),
                    category: Some(trend.category),
                    region: Some(trend.region.clone()),
                }));
            }
        }

        derived
    }
}
