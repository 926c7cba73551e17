//! Randomized simulation of search and growth movement
//!
//! Every random decision the ticks make is sampled here, from an injected
//! `Rng`, so a seeded generator reproduces a run and tests can exercise
//! the tick pipeline deterministically. The sampled [`Perturbation`] is a
//! plain value; applying it to a trend is a pure function.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Trend, TrendUpdate};

/// Fixed pool of ambient activity lines for the activity tick
pub const ACTIVITY_POOL: [&str; 5] = [
    "Search activity is climbing across global markets",
    "Analysts are watching a fresh wave of queries",
    "New conversations are forming around tracked topics",
    "Search interest is shifting between regions",
    "Live search volume just passed another peak",
];

/// Bounds for the simulated movement of trend estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Maximum growth movement per refresh, in percentage points (±)
    pub growth_jitter: f64,

    /// Maximum searches movement per refresh (±)
    pub searches_jitter: i64,

    /// Simulated concurrent-user range, lower bound
    pub active_users_min: u32,

    /// Simulated concurrent-user range, upper bound
    pub active_users_max: u32,

    /// Growth percent a trend must strictly exceed to count as
    /// "trending now" in the metrics payload
    pub trending_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            growth_jitter: 5.0,
            searches_jitter: 25_000,
            active_users_min: 5_000,
            active_users_max: 25_000,
            trending_threshold: 50.0,
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.growth_jitter <= 0.0 {
            return Err("growth_jitter must be positive".to_string());
        }
        if self.searches_jitter <= 0 {
            return Err("searches_jitter must be positive".to_string());
        }
        if self.active_users_min > self.active_users_max {
            return Err("active_users_min must not exceed active_users_max".to_string());
        }
        Ok(())
    }
}

/// One sampled movement for one trend
#[derive(Debug, Clone, Copy)]
pub struct Perturbation {
    /// Growth delta in percentage points
    pub growth_delta: f64,

    /// Searches delta
    pub searches_delta: i64,
}

impl Perturbation {
    /// Sample a bounded movement from the given random source
    pub fn sample<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        Self {
            growth_delta: rng.gen_range(-config.growth_jitter..=config.growth_jitter),
            searches_delta: rng.gen_range(-config.searches_jitter..=config.searches_jitter),
        }
    }

    /// Turn this movement into the partial update for a trend.
    ///
    /// Raw values go in; the store's write path re-clamps and re-floors.
    pub fn apply(&self, trend: &Trend) -> TrendUpdate {
        TrendUpdate::perturbation(
            trend.searches as i64 + self.searches_delta,
            trend.growth.value() + self.growth_delta,
        )
    }
}

/// Sample the simulated concurrent-user count for a metrics tick
pub fn sample_active_users<R: Rng>(config: &SimulationConfig, rng: &mut R) -> u32 {
    rng.gen_range(config.active_users_min..=config.active_users_max)
}

/// Pick one line from the ambient activity pool
pub fn pick_activity<R: Rng>(rng: &mut R) -> &'static str {
    ACTIVITY_POOL.choose(rng).copied().unwrap_or(ACTIVITY_POOL[0])
}
