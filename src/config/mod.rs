//! Configuration management for the trendcast engine
//!
//! This module handles loading and validating configuration from
//! environment variables, TOML files, and command-line overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::scheduler::simulation::SimulationConfig;
use crate::scheduler::SchedulerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP/WebSocket server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Tick periods and seeding
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Simulation bounds
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP/WebSocket listener to
    pub bind_address: SocketAddr,

    /// Enable permissive CORS on the API routes
    pub enable_cors: bool,

    /// Enable per-request tracing
    pub enable_request_logging: bool,

    /// Outbound queue bound per subscriber connection
    pub send_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8787)),
            enable_cors: true,
            enable_request_logging: true,
            send_queue_capacity: 256,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.send_queue_capacity == 0 {
            anyhow::bail!("send_queue_capacity must be greater than 0");
        }
        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
    send_queue_capacity: Option<usize>,
}

impl ServerConfigBuilder {
    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Enable or disable CORS
    pub fn enable_cors(mut self, value: bool) -> Self {
        self.enable_cors = Some(value);
        self
    }

    /// Enable or disable request tracing
    pub fn enable_request_logging(mut self, value: bool) -> Self {
        self.enable_request_logging = Some(value);
        self
    }

    /// Set the per-connection send queue bound
    pub fn send_queue_capacity(mut self, capacity: usize) -> Self {
        self.send_queue_capacity = Some(capacity);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ServerConfig> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            enable_cors: self.enable_cors.unwrap_or(defaults.enable_cors),
            enable_request_logging: self
                .enable_request_logging
                .unwrap_or(defaults.enable_request_logging),
            send_queue_capacity: self
                .send_queue_capacity
                .unwrap_or(defaults.send_queue_capacity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("TRENDCAST_BIND") {
            config.server.bind_address = bind
                .parse()
                .with_context(|| format!("invalid TRENDCAST_BIND address: {bind}"))?;
        }

        if let Some(capacity) = env_parse::<usize>("TRENDCAST_SEND_QUEUE") {
            config.server.send_queue_capacity = capacity;
        }

        if let Some(secs) = env_parse::<u64>("TRENDCAST_REFRESH_INTERVAL") {
            config.scheduler.refresh_interval_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("TRENDCAST_METRICS_INTERVAL") {
            config.scheduler.metrics_interval_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("TRENDCAST_ACTIVITY_INTERVAL") {
            config.scheduler.activity_interval_secs = secs;
        }
        if let Some(seed) = env_parse::<u64>("TRENDCAST_RNG_SEED") {
            config.scheduler.rng_seed = Some(seed);
        }

        if let Ok(level) = std::env::var("TRENDCAST_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRENDCAST_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.scheduler
            .validate()
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        self.simulation
            .validate()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}
