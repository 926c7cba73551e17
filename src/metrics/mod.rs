//! Prometheus metrics for the broadcast engine
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails (or is skipped, as in most tests), metric
//! operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Encoder, Gauge,
    TextEncoder,
};
use std::sync::OnceLock;

/// Container for all engine metrics
struct EngineMetrics {
    connected_clients: Gauge,
    trends_tracked: Gauge,
    broadcasts_total: CounterVec,
    delivery_failures: Counter,
    ticks_total: CounterVec,
    tick_errors: CounterVec,
}

/// Global storage for engine metrics
static ENGINE_METRICS: OnceLock<EngineMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup. If metric
/// registration fails, errors are logged and subsequent metric operations
/// become no-ops; the engine keeps running.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = EngineMetrics {
        connected_clients: register_gauge!(
            "trendcast_connected_clients",
            "Number of live subscriber connections"
        )?,
        trends_tracked: register_gauge!(
            "trendcast_trends_tracked",
            "Number of active trends in the store"
        )?,
        broadcasts_total: register_counter_vec!(
            "trendcast_broadcasts_total",
            "Broadcast passes by message type",
            &["message_type"]
        )?,
        delivery_failures: register_counter!(
            "trendcast_delivery_failures_total",
            "Per-connection delivery failures (dropped or pruned)"
        )?,
        ticks_total: register_counter_vec!(
            "trendcast_ticks_total",
            "Scheduler tick executions by task",
            &["task"]
        )?,
        tick_errors: register_counter_vec!(
            "trendcast_tick_errors_total",
            "Scheduler tick failures by task",
            &["task"]
        )?,
    };

    ENGINE_METRICS
        .set(metrics)
        .map_err(|_| "engine metrics already initialized")?;

    tracing::debug!("prometheus metrics registered");
    Ok(())
}

/// Record the current number of live subscriber connections
pub fn set_connected_clients(count: usize) {
    if let Some(m) = ENGINE_METRICS.get() {
        m.connected_clients.set(count as f64);
    }
}

/// Record the current number of active trends
pub fn set_trends_tracked(count: usize) {
    if let Some(m) = ENGINE_METRICS.get() {
        m.trends_tracked.set(count as f64);
    }
}

/// Count one broadcast pass for a message type
pub fn inc_broadcast(message_type: &str) {
    if let Some(m) = ENGINE_METRICS.get() {
        m.broadcasts_total.with_label_values(&[message_type]).inc();
    }
}

/// Count one per-connection delivery failure
pub fn inc_delivery_failure() {
    if let Some(m) = ENGINE_METRICS.get() {
        m.delivery_failures.inc();
    }
}

/// Count one scheduler tick execution
pub fn inc_tick(task: &str) {
    if let Some(m) = ENGINE_METRICS.get() {
        m.ticks_total.with_label_values(&[task]).inc();
    }
}

/// Count one scheduler tick failure
pub fn inc_tick_error(task: &str) {
    if let Some(m) = ENGINE_METRICS.get() {
        m.tick_errors.with_label_values(&[task]).inc();
    }
}

/// Encode the current registry in Prometheus text format
pub fn encode() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
