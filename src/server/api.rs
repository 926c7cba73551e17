//! REST API handlers for the broadcast server
//!
//! This module defines the API routes and handlers: the read surface used
//! to inspect the working set, the create surface whose side effect is the
//! `newTrend` broadcast, and the operational endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::broadcast::message::OutboundMessage;
use crate::metrics;
use crate::models::{Trend, TrendCategory, TrendDraft, TrendId};

use super::ws::ws_handler;
use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Engine stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub active_trends: usize,
    pub connected_subscribers: usize,
    pub scheduler_running: bool,
    pub uptime_secs: u64,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/api/health", get(health_check))
        // Trend endpoints
        .route("/api/trends", get(list_trends).post(create_trend))
        .route("/api/trends/category/{category}", get(list_by_category))
        .route("/api/trends/region/{region}", get(list_by_region))
        .route("/api/trends/{id}", get(get_trend))
        // Stats endpoints
        .route("/api/stats", get(get_stats))
        .route("/metrics", get(metrics_endpoint))
        // Subscriber boundary
        .route("/ws", get(ws_handler))
        .with_state(state)
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

// ============================================================================
// Trend Handlers
// ============================================================================

/// List all active trends
async fn list_trends(State(state): State<AppState>) -> axum::response::Response {
    match state.store.list().await {
        Ok(trends) => (StatusCode::OK, Json(ApiResponse::success(trends))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// List active trends in one category
async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> axum::response::Response {
    let Some(category) = TrendCategory::parse(&category) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid category: {}", category))),
        )
            .into_response();
    };

    match state.store.list_by_category(category).await {
        Ok(trends) => (StatusCode::OK, Json(ApiResponse::success(trends))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// List active trends tagged with one region
async fn list_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> axum::response::Response {
    match state.store.list_by_region(&region).await {
        Ok(trends) => (StatusCode::OK, Json(ApiResponse::success(trends))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Get one trend by id
async fn get_trend(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<TrendId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid trend id: {}", id))),
        )
            .into_response();
    };

    match state.store.get(id).await {
        Ok(trend) => (StatusCode::OK, Json(ApiResponse::success(trend))).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// Create a trend from the submission pathway.
///
/// Any successful create triggers a `newTrend` broadcast to every
/// registered subscriber before the response is returned.
async fn create_trend(
    State(state): State<AppState>,
    Json(draft): Json<TrendDraft>,
) -> axum::response::Response {
    if draft.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Trend title must not be empty")),
        )
            .into_response();
    }

    let mut draft = draft;
    if draft.ai_summary.is_none() {
        draft.ai_summary = Some(
            state
                .summarizer
                .summarize(&draft.title, draft.category)
                .await,
        );
    }

    match state.store.create(draft).await {
        Ok(trend) => {
            if let Ok(count) = state.store.count().await {
                metrics::set_trends_tracked(count);
            }
            announce_new_trend(&state, trend.clone()).await;
            (StatusCode::CREATED, Json(ApiResponse::success(trend))).into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Broadcast the `newTrend` announcement for a freshly created trend
pub async fn announce_new_trend(state: &AppState, trend: Trend) {
    let outcome = state
        .hub
        .broadcast(&OutboundMessage::new_trend(trend))
        .await;
    tracing::info!(
        attempted = outcome.attempted,
        delivered = outcome.delivered,
        "newTrend announced"
    );
}

// ============================================================================
// Stats Handlers
// ============================================================================

/// Get engine stats
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let active_trends = state.store.count().await.unwrap_or_default();

    Json(ApiResponse::success(StatsResponse {
        active_trends,
        connected_subscribers: state.registry.count().await,
        scheduler_running: state.scheduler.is_running().await,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

/// Prometheus metrics endpoint
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics::encode(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert!(response.data.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("test error");
        assert!(!response.success);
        assert_eq!(response.error, "test error");
    }

    #[test]
    fn test_error_response_omits_data_key() {
        let response = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some("boom".to_string()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["error"], "boom");
    }
}
