//! AI summary client for new trends
//!
//! This module is the collaborator boundary around the summary generator:
//! an Ollama-compatible endpoint asked for a one-line explanation of why a
//! topic is trending. The boundary absorbs every failure — transport,
//! status, decode, or an empty completion — by returning the fallback
//! string. Nothing is retried here and no error escapes.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{TrendCategory, FALLBACK_SUMMARY};

/// Configuration for the summarizer client
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Ollama endpoint URL (default: http://localhost:11434)
    pub endpoint: String,

    /// Model name to use
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b".to_string(),
            timeout_secs: 30,
            max_tokens: 128,
            temperature: 0.3,
        }
    }
}

impl SummarizerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("SUMMARIZER_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("SUMMARIZER_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("SUMMARIZER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_tokens: std::env::var("SUMMARIZER_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: std::env::var("SUMMARIZER_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the summary generator
pub struct Summarizer {
    client: Client,
    config: SummarizerConfig,
}

impl Summarizer {
    /// Create a new summarizer client
    pub fn new(config: SummarizerConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Produce a one-line summary for a new trend.
    ///
    /// Never fails: any problem at the boundary yields
    /// [`FALLBACK_SUMMARY`] with a warning in the log.
    pub async fn summarize(&self, title: &str, category: TrendCategory) -> String {
        match self.request_summary(title, category).await {
            Ok(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
            Ok(_) => {
                tracing::warn!(title = %title, "summarizer returned empty completion");
                FALLBACK_SUMMARY.to_string()
            }
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "summarizer unavailable, using fallback");
                FALLBACK_SUMMARY.to_string()
            }
        }
    }

    async fn request_summary(&self, title: &str, category: TrendCategory) -> Result<String> {
        let prompt = format!(
            "In one sentence, explain why the {category} topic '{title}' \
             is trending in web search right now."
        );

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("summary request failed")?
            .error_for_status()
            .context("summary endpoint returned error status")?;

        let body: GenerateResponse = response
            .json()
            .await
            .context("failed to decode summary response")?;

        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SummarizerConfig::default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert!(config.timeout_secs > 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        // TCP port 9 is the discard service; nothing is listening there
        let config = SummarizerConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };

        let summarizer = Summarizer::new(config).unwrap();
        let summary = summarizer.summarize("Test Topic", TrendCategory::News).await;
        assert_eq!(summary, FALLBACK_SUMMARY);
    }
}
