//! Diagnostic checks layered on top of the structural gate
//!
//! A [`QueryCheck`] reports problems through [`Diagnostics`], which can only
//! append messages. Validity and score stay with the validator.

use crate::config::ValidationConfig;
use querysmith_domain::{EsQuery, Schema, ValidationResult};
use serde_json::{Map, Value};

/// Leaf query types whose object keys are field names
const FIELD_KEYED_CLAUSES: &[&str] = &[
    "term",
    "terms",
    "match",
    "match_phrase",
    "match_phrase_prefix",
    "prefix",
    "wildcard",
    "regexp",
    "fuzzy",
    "range",
];

/// Clause options that are not field names
const CLAUSE_OPTIONS: &[&str] = &["boost", "_name"];

/// Append-only view of a validation result
pub struct Diagnostics<'a> {
    result: &'a mut ValidationResult,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(result: &'a mut ValidationResult) -> Self {
        Self { result }
    }

    /// Report a field or type that does not match the schema
    pub fn schema_error(&mut self, message: impl Into<String>) {
        self.result.schema_errors.push(message.into());
    }

    /// Report a construct that is likely to be slow
    pub fn performance_warning(&mut self, message: impl Into<String>) {
        self.result.performance_warnings.push(message.into());
    }

    /// Report a scripting or injection concern
    pub fn security_issue(&mut self, message: impl Into<String>) {
        self.result.security_issues.push(message.into());
    }

    /// Suggest an improvement
    pub fn recommend(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.result.recommendations.contains(&message) {
            self.result.recommendations.push(message);
        }
    }
}

/// One diagnostic pass over a candidate query
pub trait QueryCheck: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Inspect the query and report findings
    fn check(&self, query: &EsQuery, schema: &Schema, diagnostics: &mut Diagnostics<'_>);
}

/// Visit every object entry in a document, depth first, with its JSON path
fn walk<F>(value: &Value, path: &str, visit: &mut F)
where
    F: FnMut(&str, &str, &Value),
{
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                visit(path, key, child);
                walk(child, &child_path, visit);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &format!("{}[{}]", path, i), visit);
            }
        }
        _ => {}
    }
}

/// Field names referenced by query clauses, aggregations and sorts
///
/// Returned without duplicates.
pub fn referenced_fields(query: &EsQuery) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut add = |name: &str| {
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    };

    walk(&query.to_value(), "", &mut |_, key, value| {
        if key == "field" {
            if let Some(name) = value.as_str() {
                add(name);
            }
            return;
        }
        if !FIELD_KEYED_CLAUSES.contains(&key) {
            return;
        }
        let Some(clause) = value.as_object() else {
            return;
        };
        // Aggregations of the same name take a "field" option instead
        if clause.contains_key("field") {
            return;
        }
        for name in clause.keys() {
            if !CLAUSE_OPTIONS.contains(&name.as_str()) {
                add(name);
            }
        }
    });

    if let Some(Value::Array(sorts)) = &query.sort {
        for sort in sorts {
            match sort {
                Value::String(name) => add(name),
                Value::Object(map) => map.keys().for_each(|name| add(name)),
                _ => {}
            }
        }
    }

    fields
}

/// Resolve a dotted field path through object properties and multi-fields
fn resolves(properties: &Map<String, Value>, path: &str) -> bool {
    let mut parts = path.split('.');
    let Some(mut mapping) = parts.next().and_then(|head| properties.get(head)) else {
        return false;
    };
    for part in parts {
        let next = mapping
            .get("properties")
            .and_then(|p| p.get(part))
            .or_else(|| mapping.get("fields").and_then(|f| f.get(part)));
        match next {
            Some(m) => mapping = m,
            None => return false,
        }
    }
    true
}

/// Reports fields that are missing from the index mapping
///
/// Does nothing until a schema with properties has been imported.
pub struct SchemaFieldCheck {
    ignored: Vec<String>,
}

impl SchemaFieldCheck {
    /// Create the check, never reporting the given top-level fields
    pub fn new(ignored: Vec<String>) -> Self {
        Self { ignored }
    }
}

impl QueryCheck for SchemaFieldCheck {
    fn name(&self) -> &'static str {
        "schema_fields"
    }

    fn check(&self, query: &EsQuery, schema: &Schema, diagnostics: &mut Diagnostics<'_>) {
        let properties = &schema.mappings.properties;
        if properties.is_empty() {
            return;
        }

        for field in referenced_fields(query) {
            if field.contains('*') || field.starts_with('_') {
                continue;
            }
            let head = field.split('.').next().unwrap_or_default();
            if self.ignored.iter().any(|f| f == head) {
                continue;
            }
            if !resolves(properties, &field) {
                diagnostics.schema_error(format!(
                    "Field '{}' is not defined in index '{}'",
                    field, schema.index_name
                ));
            }
        }
    }
}

/// Flags constructs that tend to be slow on large indices
pub struct PerformanceCheck {
    max_result_window: u64,
}

impl PerformanceCheck {
    /// Create the check with the largest acceptable `from + size`
    pub fn new(max_result_window: u64) -> Self {
        Self { max_result_window }
    }
}

impl QueryCheck for PerformanceCheck {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn check(&self, query: &EsQuery, _schema: &Schema, diagnostics: &mut Diagnostics<'_>) {
        if let Some(root) = &query.query {
            walk(root, "query", &mut |path, key, value| match key {
                "wildcard" => {
                    let leading = value
                        .as_object()
                        .into_iter()
                        .flat_map(|clause| clause.values())
                        .filter_map(|v| v.get("value").unwrap_or(v).as_str())
                        .any(|pattern| pattern.starts_with('*') || pattern.starts_with('?'));
                    if leading {
                        diagnostics.performance_warning(format!(
                            "Leading wildcard at {}.{} scans every term",
                            path, key
                        ));
                        diagnostics.recommend("Use a match query instead of a leading wildcard.");
                    }
                }
                "regexp" => {
                    diagnostics
                        .performance_warning(format!("Regular expression at {}.{}", path, key));
                }
                _ => {}
            });
        }

        let window = query.from.unwrap_or(0).saturating_add(query.size.unwrap_or(0));
        if window > self.max_result_window {
            diagnostics.performance_warning(format!(
                "Result window of {} exceeds {}",
                window, self.max_result_window
            ));
            diagnostics.recommend("Page with search_after instead of a large size.");
        }
    }
}

/// Flags scripting anywhere in the query document
pub struct SecurityCheck;

impl QueryCheck for SecurityCheck {
    fn name(&self) -> &'static str {
        "security"
    }

    fn check(&self, query: &EsQuery, _schema: &Schema, diagnostics: &mut Diagnostics<'_>) {
        walk(&query.to_value(), "", &mut |path, key, _| {
            if key == "script" {
                let at = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", path, key)
                };
                diagnostics.security_issue(format!("Script found at {}", at));
            }
        });
    }
}

/// Built-in checks enabled by the configuration
pub fn default_checks(config: &ValidationConfig) -> Vec<Box<dyn QueryCheck>> {
    let mut checks: Vec<Box<dyn QueryCheck>> = Vec::new();
    if config.check_schema_fields {
        checks.push(Box::new(SchemaFieldCheck::new(config.ignored_fields.clone())));
    }
    if config.check_performance {
        checks.push(Box::new(PerformanceCheck::new(config.max_result_window)));
    }
    if config.check_security {
        checks.push(Box::new(SecurityCheck));
    }
    checks
}
