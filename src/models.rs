// Core data structures for the trendcast engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a trend by the store, monotonically increasing.
pub type TrendId = u64;

/// Floor applied to every write of the `searches` field.
pub const SEARCH_FLOOR: u64 = 10_000;

/// Summary text used when the summarizer boundary cannot produce one.
pub const FALLBACK_SUMMARY: &str = "No summary available.";

/// Trend category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Viral,
    News,
    Sports,
    Finance,
    Culture,
}

impl TrendCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viral => "viral",
            Self::News => "news",
            Self::Sports => "sports",
            Self::Finance => "finance",
            Self::Culture => "culture",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viral" => Some(Self::Viral),
            "news" => Some(Self::News),
            "sports" => Some(Self::Sports),
            "finance" => Some(Self::Finance),
            "culture" => Some(Self::Culture),
            _ => None,
        }
    }

    /// Get all categories
    pub fn all() -> Vec<Self> {
        vec![
            Self::Viral,
            Self::News,
            Self::Sports,
            Self::Finance,
            Self::Culture,
        ]
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted trajectory for a trend, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPrediction {
    WillGrow,
    WillStabilize,
    WillFade,
}

impl TrendPrediction {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WillGrow => "will_grow",
            Self::WillStabilize => "will_stabilize",
            Self::WillFade => "will_fade",
        }
    }
}

impl Default for TrendPrediction {
    fn default() -> Self {
        Self::WillStabilize
    }
}

impl fmt::Display for TrendPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Growth percentage, clamped to [-50, +500] at construction.
///
/// Serialized on the wire as an explicit-sign percent string ("+120%"),
/// which is the form subscribers receive. The numeric value is kept
/// internally so the surge threshold and metrics comparisons stay exact.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Growth(f64);

impl Growth {
    /// Lower clamp bound in percent
    pub const MIN: f64 = -50.0;

    /// Upper clamp bound in percent
    pub const MAX: f64 = 500.0;

    /// Create a growth value, clamping to the [-50, +500] range
    pub fn new(percent: f64) -> Self {
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    /// Numeric percent value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Strict threshold comparison (exactly at the threshold is false)
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

impl Default for Growth {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.0}%", self.0)
    }
}

/// Error parsing a growth string
#[derive(Debug, thiserror::Error)]
#[error("invalid growth value: {0}")]
pub struct GrowthParseError(String);

impl FromStr for Growth {
    type Err = GrowthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%');
        trimmed
            .parse::<f64>()
            .map(Growth::new)
            .map_err(|_| GrowthParseError(s.to_string()))
    }
}

impl Serialize for Growth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Growth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Apply the searches floor
pub fn floor_searches(searches: i64) -> u64 {
    searches.max(SEARCH_FLOOR as i64) as u64
}

/// A tracked topic and its live search estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub id: TrendId,
    pub title: String,
    pub category: TrendCategory,
    pub region: String,
    pub searches: u64,
    pub growth: Growth,
    pub countries: u32,
    pub ai_summary: String,
    pub prediction: TrendPrediction,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a trend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDraft {
    pub title: String,
    pub category: TrendCategory,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub searches: u64,
    #[serde(default)]
    pub growth: f64,
    #[serde(default)]
    pub countries: u32,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub prediction: TrendPrediction,
}

fn default_region() -> String {
    "global".to_string()
}

/// Partial mutation of a trend; absent fields are left untouched.
///
/// Clamping of `searches` and `growth` happens at the store write path,
/// so callers may hand in raw perturbed values.
#[derive(Debug, Clone, Default)]
pub struct TrendUpdate {
    pub searches: Option<i64>,
    pub growth: Option<f64>,
    pub is_active: Option<bool>,
    pub ai_summary: Option<String>,
}

impl TrendUpdate {
    /// Update that only touches the tick-mutated fields
    pub fn perturbation(searches: i64, growth: f64) -> Self {
        Self {
            searches: Some(searches),
            growth: Some(growth),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_category_roundtrip() {
        for category in TrendCategory::all() {
            assert_eq!(TrendCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(TrendCategory::parse("VIRAL"), Some(TrendCategory::Viral));
        assert_eq!(TrendCategory::parse("invalid"), None);
    }

    #[test]
    fn test_prediction_default() {
        assert_eq!(TrendPrediction::default(), TrendPrediction::WillStabilize);
        assert_eq!(TrendPrediction::WillGrow.as_str(), "will_grow");
    }

    #[test]
    fn test_growth_clamps_at_bounds() {
        assert_eq!(Growth::new(600.0).value(), 500.0);
        assert_eq!(Growth::new(-80.0).value(), -50.0);
        assert_eq!(Growth::new(120.0).value(), 120.0);
    }

    #[test]
    fn test_growth_formats_with_sign() {
        assert_eq!(Growth::new(100.0).to_string(), "+100%");
        assert_eq!(Growth::new(-50.0).to_string(), "-50%");
        assert_eq!(Growth::new(0.0).to_string(), "+0%");
    }

    #[test]
    fn test_growth_parse() {
        assert_eq!("+100%".parse::<Growth>().unwrap().value(), 100.0);
        assert_eq!("-25%".parse::<Growth>().unwrap().value(), -25.0);
        assert_eq!("999%".parse::<Growth>().unwrap().value(), 500.0);
        assert!("not-a-number".parse::<Growth>().is_err());
    }

    #[test]
    fn test_growth_strict_threshold() {
        assert!(!Growth::new(150.0).exceeds(150.0));
        assert!(Growth::new(150.1).exceeds(150.0));
    }

    #[test]
    fn test_floor_searches() {
        assert_eq!(floor_searches(-5_000), SEARCH_FLOOR);
        assert_eq!(floor_searches(9_999), SEARCH_FLOOR);
        assert_eq!(floor_searches(125_000), 125_000);
    }

    #[test]
    fn test_trend_wire_format_is_camel_case() {
        let trend = Trend {
            id: 1,
            title: "Quantum Laptops".to_string(),
            category: TrendCategory::Viral,
            region: "global".to_string(),
            searches: 150_000,
            growth: Growth::new(85.0),
            countries: 23,
            ai_summary: FALLBACK_SUMMARY.to_string(),
            prediction: TrendPrediction::WillGrow,
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&trend).unwrap();
        assert_eq!(json["aiSummary"], FALLBACK_SUMMARY);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["growth"], "+85%");
        assert_eq!(json["category"], "viral");
        assert_eq!(json["prediction"], "will_grow");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_draft_defaults() {
        let draft: TrendDraft =
            serde_json::from_str(r#"{"title": "Test", "category": "news"}"#).unwrap();
        assert_eq!(draft.region, "global");
        assert_eq!(draft.prediction, TrendPrediction::WillStabilize);
        assert!(draft.ai_summary.is_none());
    }

    proptest! {
        #[test]
        fn growth_never_escapes_bounds(percent in -10_000.0f64..10_000.0) {
            let growth = Growth::new(percent);
            prop_assert!(growth.value() >= Growth::MIN);
            prop_assert!(growth.value() <= Growth::MAX);
        }

        #[test]
        fn searches_never_fall_below_floor(searches in -1_000_000i64..1_000_000) {
            prop_assert!(floor_searches(searches) >= SEARCH_FLOOR);
        }
    }
}
