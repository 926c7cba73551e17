//! Seed data for the trend store
//!
//! The engine starts from a working set so early subscribers see data on
//! the first tick. Drafts come either from the built-in set below or from
//! a JSON file supplied on the command line.

use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{TrendCategory, TrendDraft, TrendPrediction};

use super::TrendStore;

/// Built-in starting set
pub fn default_drafts() -> Vec<TrendDraft> {
    vec![
        TrendDraft {
            title: "AI Video Generators".to_string(),
            category: TrendCategory::Viral,
            region: "global".to_string(),
            searches: 890_000,
            growth: 145.0,
            countries: 42,
            ai_summary: Some(
                "Short-form AI video tools are spreading through creator communities."
                    .to_string(),
            ),
            prediction: TrendPrediction::WillGrow,
        },
        TrendDraft {
            title: "Transfer Window Rumors".to_string(),
            category: TrendCategory::Sports,
            region: "UK".to_string(),
            searches: 460_000,
            growth: 62.0,
            countries: 18,
            ai_summary: Some(
                "Deadline-day speculation is driving repeat searches across Europe.".to_string(),
            ),
            prediction: TrendPrediction::WillFade,
        },
        TrendDraft {
            title: "Central Bank Rate Decision".to_string(),
            category: TrendCategory::Finance,
            region: "US".to_string(),
            searches: 310_000,
            growth: 38.0,
            countries: 27,
            ai_summary: Some(
                "Markets are pricing in the next rate announcement ahead of schedule."
                    .to_string(),
            ),
            prediction: TrendPrediction::WillStabilize,
        },
        TrendDraft {
            title: "Streaming Awards Night".to_string(),
            category: TrendCategory::Culture,
            region: "global".to_string(),
            searches: 275_000,
            growth: 84.0,
            countries: 31,
            ai_summary: Some(
                "Award-show clips are circulating faster than the broadcast itself.".to_string(),
            ),
            prediction: TrendPrediction::WillFade,
        },
        TrendDraft {
            title: "Coastal Storm Warnings".to_string(),
            category: TrendCategory::News,
            region: "JP".to_string(),
            searches: 520_000,
            growth: 112.0,
            countries: 9,
            ai_summary: Some(
                "Regional storm coverage is pulling sustained search attention.".to_string(),
            ),
            prediction: TrendPrediction::WillGrow,
        },
    ]
}

/// Load drafts from a JSON file (an array of trend drafts)
pub async fn drafts_from_file(path: &Path) -> Result<Vec<TrendDraft>> {
    let content = tokio::fs::read_to_string(path).await?;
    let drafts: Vec<TrendDraft> = serde_json::from_str(&content)?;
    if drafts.is_empty() {
        return Err(Error::config(format!(
            "seed file {} contains no trends",
            path.display()
        )));
    }
    Ok(drafts)
}

/// Populate a store with the given drafts; returns how many were created
pub async fn seed_store(store: &dyn TrendStore, drafts: Vec<TrendDraft>) -> Result<usize> {
    let mut created = 0;
    for draft in drafts {
        store.create(draft).await?;
        created += 1;
    }
    tracing::info!(count = created, "trend store seeded");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTrendStore;

    #[test]
    fn test_default_drafts_cover_every_category() {
        let drafts = default_drafts();
        for category in TrendCategory::all() {
            assert!(
                drafts.iter().any(|d| d.category == category),
                "missing seed for {category}"
            );
        }
    }

    #[tokio::test]
    async fn test_seed_store_creates_all() {
        let store = InMemoryTrendStore::new();
        let created = seed_store(&store, default_drafts()).await.unwrap();
        assert_eq!(created, default_drafts().len());
        assert_eq!(store.count().await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_drafts_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let json = serde_json::to_string(&default_drafts()).unwrap();
        tokio::fs::write(&path, json).await.unwrap();

        let drafts = drafts_from_file(&path).await.unwrap();
        assert_eq!(drafts.len(), default_drafts().len());
    }

    #[tokio::test]
    async fn test_empty_seed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        tokio::fs::write(&path, "[]").await.unwrap();

        assert!(drafts_from_file(&path).await.is_err());
    }
}
