//! Index schema and example corpus records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field mappings of the target index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mappings {
    /// Field name to mapping definition
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Description of the index queries are built against
///
/// Read-only for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Field mappings
    #[serde(default)]
    pub mappings: Mappings,

    /// Schema version label
    pub version: String,

    /// When the schema was last imported (ISO 8601)
    pub last_updated: String,

    /// Target index name
    pub index_name: String,
}

impl Default for Schema {
    /// Placeholder used before a real schema is imported
    fn default() -> Self {
        Self {
            mappings: Mappings::default(),
            version: "1.0".to_string(),
            last_updated: String::new(),
            index_name: "default_index".to_string(),
        }
    }
}

impl Schema {
    /// Names of the top-level mapped fields, in mapping order
    pub fn field_names(&self) -> Vec<&str> {
        self.mappings.properties.keys().map(String::as_str).collect()
    }

    /// Mapping type of a top-level field, if declared
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.mappings
            .properties
            .get(field)
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
    }
}

/// One entry of the example corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuery {
    /// Stable identifier
    pub id: String,

    /// What the query does
    pub description: String,

    /// The natural-language request it answers
    pub user_intent: String,

    /// The query document
    pub query: Value,

    /// Category tags, e.g. "company", "aggregation"
    #[serde(default)]
    pub tags: Vec<String>,

    /// simple, medium or complex
    #[serde(default)]
    pub complexity: String,

    /// Observed success rate
    #[serde(default)]
    pub success_rate: f64,

    /// Business context, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_context: Option<String>,

    /// Performance notes, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_notes: Option<String>,
}

impl SampleQuery {
    /// True when the entry carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
