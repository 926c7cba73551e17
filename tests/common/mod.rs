//! Common test utilities

use tokio::sync::mpsc;
use trendcast::models::{TrendCategory, TrendDraft, TrendPrediction};

/// Create a test draft with default values
pub fn create_test_draft(title: &str, category: TrendCategory) -> TrendDraft {
    TrendDraft {
        title: title.to_string(),
        category,
        region: "global".to_string(),
        searches: 100_000,
        growth: 40.0,
        countries: 8,
        ai_summary: Some(format!("{title} is seeing broad search interest.")),
        prediction: TrendPrediction::WillStabilize,
    }
}

/// Create a draft with explicit searches and growth
#[allow(dead_code)]
pub fn create_draft_with_estimates(title: &str, searches: u64, growth: f64) -> TrendDraft {
    TrendDraft {
        searches,
        growth,
        ..create_test_draft(title, TrendCategory::Viral)
    }
}

/// Drain every message currently queued on a subscriber channel,
/// parsed as JSON
#[allow(dead_code)]
pub fn drain_messages(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
    let mut messages = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        messages.push(serde_json::from_str(&payload).expect("broadcast payload is JSON"));
    }
    messages
}

/// Count drained messages of one envelope type
#[allow(dead_code)]
pub fn count_of_type(messages: &[serde_json::Value], message_type: &str) -> usize {
    messages
        .iter()
        .filter(|m| m["type"] == message_type)
        .count()
}
