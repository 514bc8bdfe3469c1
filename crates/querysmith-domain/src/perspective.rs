//! Perspective module - a named strategy for building one candidate query

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a perspective based on UUIDv7
///
/// UUIDv7 keeps ids from one batch in generation order, which makes
/// log trails easy to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PerspectiveId(u128);

impl PerspectiveId {
    /// Generate a new UUIDv7-based PerspectiveId
    ///
    /// # Examples
    ///
    /// ```
    /// use querysmith_domain::PerspectiveId;
    ///
    /// let id = PerspectiveId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a PerspectiveId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a PerspectiveId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use querysmith_domain::PerspectiveId;
    ///
    /// let id = PerspectiveId::new();
    /// let parsed = PerspectiveId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid perspective id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for PerspectiveId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PerspectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for PerspectiveId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PerspectiveId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PerspectiveId::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// How a perspective approaches query construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Term queries on keyword fields
    ExactMatch,

    /// Match queries on analyzed fields
    FuzzySearch,

    /// Aggregations and statistics
    Analytics,

    /// Time-bucketed analysis
    TrendAnalysis,
}

impl Approach {
    /// Get the approach as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Approach::ExactMatch => "exact_match",
            Approach::FuzzySearch => "fuzzy_search",
            Approach::Analytics => "analytics",
            Approach::TrendAnalysis => "trend_analysis",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query-construction strategy derived from an intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perspective {
    /// Unique identifier
    pub id: PerspectiveId,

    /// Display name, e.g. "Targeted Search"
    pub name: String,

    /// One-line description
    pub description: String,

    /// Construction approach
    pub approach: Approach,

    /// Why this perspective was chosen
    pub reasoning: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Estimated query complexity (small integer)
    pub estimated_complexity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_id_ordering() {
        let id1 = PerspectiveId::from_value(1000);
        let id2 = PerspectiveId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_perspective_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..100).map(|_| PerspectiveId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_perspective_id_invalid_string() {
        assert!(PerspectiveId::from_string("not-a-uuid").is_err());
        assert!(PerspectiveId::from_string("").is_err());
    }

    #[test]
    fn test_perspective_serializes_id_as_string() {
        let perspective = Perspective {
            id: PerspectiveId::from_value(42),
            name: "Targeted Search".to_string(),
            description: "d".to_string(),
            approach: Approach::ExactMatch,
            reasoning: "r".to_string(),
            confidence: 0.5,
            estimated_complexity: 2,
        };

        let json = serde_json::to_value(&perspective).unwrap();
        assert_eq!(json["approach"], "exact_match");
        assert_eq!(json["estimatedComplexity"], 2);
        assert!(json["id"].is_string());

        let back: Perspective = serde_json::from_value(json).unwrap();
        assert_eq!(back, perspective);
    }
}
