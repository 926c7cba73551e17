//! Periodic tick scheduler
//!
//! Owns the three independent heartbeats of the engine:
//!
//! - **Trend-refresh tick** (3 min) - perturbs every active trend, runs the
//!   classifier over the mutated batch, broadcasts `trendsUpdate` plus any
//!   derived messages
//! - **Metrics tick** (1 min) - aggregates the current trend list into a
//!   `metricsUpdate`
//! - **Activity tick** (45 s) - broadcasts one ambient `activityUpdate`
//!
//! Each tick runs in its own spawned task over a `tokio::time::interval`
//! (whose first tick fires immediately, so subscribers connecting early see
//! data without waiting a full period). The tasks are independent fault
//! domains: a failing tick is logged and counted, and the next firing of
//! that task - and of the other two - proceeds normally.
//!
//! `start()` is idempotent; `stop()` signals all three tasks and joins
//! them, so once it returns no further tick can broadcast.
//!
//! # Example
//!
//! ```rust,ignore
//! let scheduler = TickScheduler::new(
//!     store,
//!     hub,
//!     EventClassifier::default(),
//!     SchedulerConfig::default(),
//!     SimulationConfig::default(),
//! )?;
//! scheduler.start().await;
//! // ... engine runs ...
//! scheduler.stop().await;
//! ```

pub mod simulation;

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::broadcast::message::{ActivityEvent, OutboundMessage, TrendMetrics};
use crate::broadcast::BroadcastHub;
use crate::classifier::EventClassifier;
use crate::error::Result as EngineResult;
use crate::metrics;
use crate::store::TrendStore;

use simulation::{pick_activity, sample_active_users, Perturbation, SimulationConfig};

// ============================================================================
// Configuration
// ============================================================================

/// Errors raised while configuring or running the scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid scheduler config: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl SchedulerError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Tick periods and random seeding for the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Trend-refresh period in seconds
    pub refresh_interval_secs: u64,

    /// Metrics period in seconds
    pub metrics_interval_secs: u64,

    /// Activity period in seconds
    pub activity_interval_secs: u64,

    /// Seed for the per-task random streams; None draws from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 180,
            metrics_interval_secs: 60,
            activity_interval_secs: 45,
            rng_seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Create a new config builder
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.refresh_interval_secs == 0 {
            return Err(SchedulerError::invalid(
                "refresh_interval_secs",
                "must be greater than 0",
            ));
        }
        if self.metrics_interval_secs == 0 {
            return Err(SchedulerError::invalid(
                "metrics_interval_secs",
                "must be greater than 0",
            ));
        }
        if self.activity_interval_secs == 0 {
            return Err(SchedulerError::invalid(
                "activity_interval_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Builder for SchedulerConfig
#[derive(Debug, Default)]
pub struct SchedulerConfigBuilder {
    refresh_interval_secs: Option<u64>,
    metrics_interval_secs: Option<u64>,
    activity_interval_secs: Option<u64>,
    rng_seed: Option<u64>,
}

impl SchedulerConfigBuilder {
    /// Set the trend-refresh period
    pub fn refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = Some(secs);
        self
    }

    /// Set the metrics period
    pub fn metrics_interval_secs(mut self, secs: u64) -> Self {
        self.metrics_interval_secs = Some(secs);
        self
    }

    /// Set the activity period
    pub fn activity_interval_secs(mut self, secs: u64) -> Self {
        self.activity_interval_secs = Some(secs);
        self
    }

    /// Seed the per-task random streams
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<SchedulerConfig, SchedulerError> {
        let defaults = SchedulerConfig::default();
        let config = SchedulerConfig {
            refresh_interval_secs: self
                .refresh_interval_secs
                .unwrap_or(defaults.refresh_interval_secs),
            metrics_interval_secs: self
                .metrics_interval_secs
                .unwrap_or(defaults.metrics_interval_secs),
            activity_interval_secs: self
                .activity_interval_secs
                .unwrap_or(defaults.activity_interval_secs),
            rng_seed: self.rng_seed,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tick Functions
// ============================================================================

/// One trend-refresh pass: perturb every active trend, classify the
/// mutated batch, broadcast the batch and any derived messages.
///
/// A mutation failure on one trend is logged and that trend is skipped;
/// the rest of the batch proceeds.
pub async fn refresh_tick<R: Rng>(
    store: &dyn TrendStore,
    classifier: &EventClassifier,
    hub: &BroadcastHub,
    config: &SimulationConfig,
    rng: &mut R,
) -> EngineResult<()> {
    let trends = store.list().await?;
    let mut batch = Vec::with_capacity(trends.len());

    for trend in trends {
        let perturbation = Perturbation::sample(config, rng);
        match store.update(trend.id, perturbation.apply(&trend)).await {
            Ok(updated) => batch.push(updated),
            Err(e) => {
                tracing::warn!(trend_id = trend.id, error = %e, "skipping trend during refresh");
            }
        }
    }

    metrics::set_trends_tracked(batch.len());

    let derived = classifier.classify(&batch, rng);
    hub.broadcast(&OutboundMessage::trends_update(batch)).await;
    for message in derived {
        hub.broadcast(&message).await;
    }

    Ok(())
}

/// One metrics pass: aggregate the current list and broadcast it
pub async fn metrics_tick<R: Rng>(
    store: &dyn TrendStore,
    hub: &BroadcastHub,
    config: &SimulationConfig,
    rng: &mut R,
) -> EngineResult<()> {
    let trends = store.list().await?;

    let data = TrendMetrics {
        total_searches: trends.iter().map(|t| t.searches).sum(),
        active_users: sample_active_users(config, rng),
        trending_now: trends
            .iter()
            .filter(|t| t.growth.exceeds(config.trending_threshold))
            .count(),
    };

    hub.broadcast(&OutboundMessage::metrics_update(data)).await;
    Ok(())
}

/// One activity pass: one line from the fixed pool
pub async fn activity_tick<R: Rng>(hub: &BroadcastHub, rng: &mut R) -> EngineResult<()> {
    let line = pick_activity(rng);
    hub.broadcast(&OutboundMessage::activity_update(ActivityEvent {
        message: line.to_string(),
        category: None,
        region: None,
    }))
    .await;
    Ok(())
}

// ============================================================================
// Tick Scheduler
// ============================================================================

struct RunningTasks {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

/// Owns the three periodic tasks
pub struct TickScheduler {
    store: Arc<dyn TrendStore>,
    hub: Arc<BroadcastHub>,
    classifier: EventClassifier,
    config: SchedulerConfig,
    simulation: SimulationConfig,
    running: Mutex<Option<RunningTasks>>,
}

impl TickScheduler {
    /// Create a scheduler; fails only on invalid configuration
    pub fn new(
        store: Arc<dyn TrendStore>,
        hub: Arc<BroadcastHub>,
        classifier: EventClassifier,
        config: SchedulerConfig,
        simulation: SimulationConfig,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        simulation
            .validate()
            .map_err(|reason| SchedulerError::invalid("simulation", reason))?;

        Ok(Self {
            store,
            hub,
            classifier,
            config,
            simulation,
            running: Mutex::new(None),
        })
    }

    /// Whether the periodic tasks are currently running
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Start the three periodic tasks.
    ///
    /// Idempotent: calling while already running is a no-op, not a second
    /// set of timers. Each task fires once immediately.
    pub async fn start(&self) {
        let mut running = self.running.lock().await;
        if running.is_some() {
            tracing::debug!("scheduler already running, start() ignored");
            return;
        }

        let (shutdown, _) = watch::channel(false);
        let seed = self.config.rng_seed;

        let handles = vec![
            self.spawn_refresh(shutdown.subscribe(), task_rng(seed, 0)),
            self.spawn_metrics(shutdown.subscribe(), task_rng(seed, 1)),
            self.spawn_activity(shutdown.subscribe(), task_rng(seed, 2)),
        ];

        *running = Some(RunningTasks { shutdown, handles });
        tracing::info!(
            refresh_secs = self.config.refresh_interval_secs,
            metrics_secs = self.config.metrics_interval_secs,
            activity_secs = self.config.activity_interval_secs,
            "scheduler started"
        );
    }

    /// Stop all periodic tasks.
    ///
    /// Safe to call when never started. An in-flight tick completes; by the
    /// time this returns all three tasks have exited, so no further
    /// broadcast originates from the scheduler.
    pub async fn stop(&self) {
        let tasks = self.running.lock().await.take();
        let Some(RunningTasks { shutdown, handles }) = tasks else {
            return;
        };

        let _ = shutdown.send(true);
        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "scheduler task ended abnormally");
                }
            }
        }
        tracing::info!("scheduler stopped");
    }

    fn spawn_refresh(
        &self,
        mut shutdown: watch::Receiver<bool>,
        mut rng: ChaCha8Rng,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let hub = Arc::clone(&self.hub);
        let classifier = self.classifier;
        let simulation = self.simulation.clone();
        let period = Duration::from_secs(self.config.refresh_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        metrics::inc_tick("refresh");
                        if let Err(e) =
                            refresh_tick(store.as_ref(), &classifier, &hub, &simulation, &mut rng).await
                        {
                            metrics::inc_tick_error("refresh");
                            tracing::error!(error = %e, "trend refresh tick failed");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }

    fn spawn_metrics(
        &self,
        mut shutdown: watch::Receiver<bool>,
        mut rng: ChaCha8Rng,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let hub = Arc::clone(&self.hub);
        let simulation = self.simulation.clone();
        let period = Duration::from_secs(self.config.metrics_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        metrics::inc_tick("metrics");
                        if let Err(e) = metrics_tick(store.as_ref(), &hub, &simulation, &mut rng).await {
                            metrics::inc_tick_error("metrics");
                            tracing::error!(error = %e, "metrics tick failed");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }

    fn spawn_activity(
        &self,
        mut shutdown: watch::Receiver<bool>,
        mut rng: ChaCha8Rng,
    ) -> JoinHandle<()> {
        let hub = Arc::clone(&self.hub);
        let period = Duration::from_secs(self.config.activity_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        metrics::inc_tick("activity");
                        if let Err(e) = activity_tick(&hub, &mut rng).await {
                            metrics::inc_tick_error("activity");
                            tracing::error!(error = %e, "activity tick failed");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }
}

/// Per-task random stream: a fixed offset per task keeps seeded runs
/// deterministic without the tasks contending on one generator
fn task_rng(seed: Option<u64>, offset: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(offset)),
        None => ChaCha8Rng::from_entropy(),
    }
}
