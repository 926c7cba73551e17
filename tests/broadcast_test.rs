//! Integration tests for fan-out delivery

mod common;

use common::{count_of_type, create_test_draft, drain_messages};
use std::sync::Arc;
use trendcast::broadcast::message::TrendMetrics;
use trendcast::broadcast::{BroadcastHub, ConnectionRegistry, OutboundMessage};
use trendcast::config::Config;
use trendcast::models::TrendCategory;
use trendcast::server::api::announce_new_trend;
use trendcast::server::BroadcastServer;
use trendcast::store::{InMemoryTrendStore, TrendStore};

fn metrics_message() -> OutboundMessage {
    OutboundMessage::metrics_update(TrendMetrics {
        total_searches: 500_000,
        active_users: 9_000,
        trending_now: 2,
    })
}

#[tokio::test]
async fn test_n_connections_n_delivery_attempts() {
    let registry = Arc::new(ConnectionRegistry::new(16));
    let hub = BroadcastHub::new(Arc::clone(&registry));

    let mut receivers = Vec::new();
    for _ in 0..5 {
        let (_, rx) = registry.register().await;
        receivers.push(rx);
    }

    let outcome = hub.broadcast(&metrics_message()).await;
    assert_eq!(outcome.attempted, 5);
    assert_eq!(outcome.delivered, 5);

    for rx in &mut receivers {
        let messages = drain_messages(rx);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["type"], "metricsUpdate");
    }
}

#[tokio::test]
async fn test_unregistered_connection_stops_receiving() {
    let registry = Arc::new(ConnectionRegistry::new(16));
    let hub = BroadcastHub::new(Arc::clone(&registry));

    let (_id1, mut rx1) = registry.register().await;
    let (id2, mut rx2) = registry.register().await;
    let (_id3, mut rx3) = registry.register().await;

    hub.broadcast(&metrics_message()).await;
    registry.unregister(&id2).await;
    hub.broadcast(&metrics_message()).await;

    assert_eq!(drain_messages(&mut rx1).len(), 2);
    assert_eq!(drain_messages(&mut rx2).len(), 1);
    assert_eq!(drain_messages(&mut rx3).len(), 2);
}

#[tokio::test]
async fn test_closed_subscriber_is_isolated_and_pruned() {
    let registry = Arc::new(ConnectionRegistry::new(16));
    let hub = BroadcastHub::new(Arc::clone(&registry));

    let (_id1, mut rx1) = registry.register().await;
    let (_id2, rx2) = registry.register().await;
    let (_id3, mut rx3) = registry.register().await;
    drop(rx2);

    let outcome = hub.broadcast(&metrics_message()).await;
    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.delivered, 2);
    assert_eq!(outcome.pruned, 1);
    assert_eq!(registry.count().await, 2);

    assert_eq!(drain_messages(&mut rx1).len(), 1);
    assert_eq!(drain_messages(&mut rx3).len(), 1);

    // The pruned connection is gone for good
    let outcome = hub.broadcast(&metrics_message()).await;
    assert_eq!(outcome.attempted, 2);
}

#[tokio::test]
async fn test_create_triggers_new_trend_broadcast_to_all() {
    let store: Arc<dyn TrendStore> = Arc::new(InMemoryTrendStore::new());
    let server = BroadcastServer::new(Config::default(), Arc::clone(&store)).unwrap();
    let state = server.state();

    let mut receivers = Vec::new();
    for _ in 0..3 {
        let (_, rx) = state.registry.register().await;
        receivers.push(rx);
    }

    let trend = store
        .create(create_test_draft("Brand New", TrendCategory::Finance))
        .await
        .unwrap();
    announce_new_trend(&state, trend.clone()).await;

    for rx in &mut receivers {
        let messages = drain_messages(rx);
        assert_eq!(count_of_type(&messages, "newTrend"), 1);
        assert_eq!(messages[0]["trend"]["title"], "Brand New");
        assert_eq!(messages[0]["trend"]["id"], trend.id);
        assert!(messages[0]["message"]
            .as_str()
            .unwrap()
            .contains("Brand New"));
    }
}

#[tokio::test]
async fn test_envelope_shape_is_shared_across_types() {
    let registry = Arc::new(ConnectionRegistry::new(16));
    let hub = BroadcastHub::new(Arc::clone(&registry));
    let (_, mut rx) = registry.register().await;

    hub.broadcast(&metrics_message()).await;

    let messages = drain_messages(&mut rx);
    let envelope = messages[0].as_object().unwrap();
    assert!(envelope.contains_key("type"));
    assert!(envelope.contains_key("timestamp"));
    // Timestamp is RFC3339 and parseable
    let ts = envelope["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}
