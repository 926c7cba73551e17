//! Broadcast server implementation
//!
//! This module wires the engine together behind an axum server: the REST
//! surface for reading and creating trends, the Prometheus endpoint, and
//! the WebSocket subscriber boundary at `/ws`. The scheduler is started
//! with the server and stopped on graceful shutdown.

pub mod api;
pub mod ws;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::broadcast::{BroadcastHub, ConnectionRegistry};
use crate::classifier::EventClassifier;
use crate::config::{Config, ServerConfig};
use crate::scheduler::TickScheduler;
use crate::store::TrendStore;
use crate::summarizer::{Summarizer, SummarizerConfig};

use api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Trend repository
    pub store: Arc<dyn TrendStore>,

    /// Live subscriber connections
    pub registry: Arc<ConnectionRegistry>,

    /// Fan-out hub
    pub hub: Arc<BroadcastHub>,

    /// Periodic tick scheduler
    pub scheduler: Arc<TickScheduler>,

    /// AI summary boundary
    pub summarizer: Arc<Summarizer>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: ServerConfig,
}

// ============================================================================
// Broadcast Server
// ============================================================================

/// Main broadcast server
pub struct BroadcastServer {
    config: ServerConfig,
    state: AppState,
}

impl BroadcastServer {
    /// Create a new broadcast server around an already-seeded store
    pub fn new(config: Config, store: Arc<dyn TrendStore>) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        let registry = Arc::new(ConnectionRegistry::new(config.server.send_queue_capacity));
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&registry)));

        let scheduler = Arc::new(
            TickScheduler::new(
                Arc::clone(&store),
                Arc::clone(&hub),
                EventClassifier::default(),
                config.scheduler.clone(),
                config.simulation.clone(),
            )
            .map_err(|e| ServerError::InitError(e.to_string()))?,
        );

        let summarizer = Arc::new(
            Summarizer::new(SummarizerConfig::from_env())
                .map_err(|e| ServerError::InitError(e.to_string()))?,
        );

        let state = AppState {
            store,
            registry,
            hub,
            scheduler,
            summarizer,
            start_time: Instant::now(),
            config: config.server.clone(),
        };

        Ok(Self {
            config: config.server,
            state,
        })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server and the scheduler
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting broadcast server on {}", addr);
        self.state.scheduler.start().await;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown; the scheduler is stopped once the
    /// shutdown future resolves and the server drains
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting broadcast server on {} (with graceful shutdown)", addr);
        self.state.scheduler.start().await;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        self.state.scheduler.stop().await;
        tracing::info!("Broadcast server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Configuration error
    ConfigError(String),

    /// Initialization error
    InitError(String),

    /// Failed to bind to address
    BindError(String),

    /// Server error
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InitError(msg) => write!(f, "Initialization error: {}", msg),
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTrendStore;

    fn test_server() -> BroadcastServer {
        let store = Arc::new(InMemoryTrendStore::new());
        BroadcastServer::new(Config::default(), store).unwrap()
    }

    #[test]
    fn test_server_creation() {
        let store: Arc<dyn TrendStore> = Arc::new(InMemoryTrendStore::new());
        let server = BroadcastServer::new(Config::default(), store);
        assert!(server.is_ok());
    }

    #[test]
    fn test_server_rejects_invalid_config() {
        let mut config = Config::default();
        config.server.send_queue_capacity = 0;
        let store: Arc<dyn TrendStore> = Arc::new(InMemoryTrendStore::new());

        let result = BroadcastServer::new(config, store);
        assert!(matches!(result, Err(ServerError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_state_starts_empty_and_stopped() {
        let server = test_server();
        let state = server.state();

        assert_eq!(state.registry.count().await, 0);
        assert!(!state.scheduler.is_running().await);
        assert_eq!(state.store.count().await.unwrap(), 0);
    }
}
