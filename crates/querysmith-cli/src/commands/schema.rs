//! Schema command implementation.

use crate::cli::{SchemaAction, SchemaArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{Mappings, Schema, SettingsStore};
use querysmith_store::StoreError;
use serde_json::{Map, Value};
use std::fs;

/// Execute the schema command.
pub async fn execute_schema<S>(args: SchemaArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: SettingsStore<Error = StoreError>,
{
    match args.action {
        SchemaAction::Show => {
            let schema = store.get_schema().await?;
            println!("{}", formatter.format_schema(&schema)?);
        }
        SchemaAction::Import { file, index } => {
            let contents = fs::read_to_string(&file)?;
            let value: Value = serde_json::from_str(&contents)?;
            let mut schema = parse_schema(value, index)?;
            schema.last_updated = chrono::Utc::now().to_rfc3339();

            store.set_schema(&schema).await?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Imported {} field(s) for index '{}'",
                    schema.mappings.properties.len(),
                    schema.index_name
                ))
            );
        }
    }
    Ok(())
}

/// Read a schema document or an Elasticsearch mapping.
///
/// Accepts a stored schema (`{mappings, version, lastUpdated, indexName}`),
/// a `GET <index>/_mapping` response, a bare `{mappings: ...}` object or a
/// bare `{properties: ...}` object. `index` overrides any name in the file.
pub fn parse_schema(value: Value, index: Option<String>) -> Result<Schema> {
    let mut schema = match serde_json::from_value::<Schema>(value.clone()) {
        Ok(schema) => schema,
        Err(_) => {
            let (name, properties) = mapping_properties(&value).ok_or_else(|| {
                CliError::InvalidInput("No field mappings found in schema file".to_string())
            })?;
            let mut schema = Schema {
                mappings: Mappings { properties },
                ..Schema::default()
            };
            if let Some(name) = name {
                schema.index_name = name;
            }
            schema
        }
    };

    if let Some(index) = index {
        schema.index_name = index;
    }
    if schema.mappings.properties.is_empty() {
        return Err(CliError::InvalidInput("Schema has no mapped fields".to_string()));
    }
    Ok(schema)
}

fn mapping_properties(value: &Value) -> Option<(Option<String>, Map<String, Value>)> {
    if let Some(properties) = value.get("properties").and_then(Value::as_object) {
        return Some((None, properties.clone()));
    }
    if let Some(mappings) = value.get("mappings") {
        return mapping_properties(mappings);
    }

    // `_mapping` responses are keyed by index name
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    let (name, inner) = object.iter().next()?;
    let (_, properties) = mapping_properties(inner.get("mappings")?)?;
    Some((Some(name.clone()), properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use querysmith_store::MemorySettingsStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn job_properties() -> Value {
        json!({
            "job_title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}},
            "posted_date": {"type": "date"}
        })
    }

    #[test]
    fn test_full_schema_document() {
        let value = json!({
            "mappings": {"properties": job_properties()},
            "version": "2.1",
            "lastUpdated": "2024-01-01T00:00:00Z",
            "indexName": "jobs"
        });
        let schema = parse_schema(value, None).unwrap();
        assert_eq!(schema.index_name, "jobs");
        assert_eq!(schema.version, "2.1");
        assert_eq!(schema.field_type("posted_date"), Some("date"));
    }

    #[test]
    fn test_mapping_response() {
        let value = json!({"job_postings": {"mappings": {"properties": job_properties()}}});
        let schema = parse_schema(value, None).unwrap();
        assert_eq!(schema.index_name, "job_postings");
        assert_eq!(schema.mappings.properties.len(), 2);
    }

    #[test]
    fn test_bare_properties_with_index_override() {
        let value = json!({"properties": job_properties()});
        let schema = parse_schema(value, Some("jobs-v2".to_string())).unwrap();
        assert_eq!(schema.index_name, "jobs-v2");
        assert_eq!(schema.version, Schema::default().version);
    }

    #[test]
    fn test_unrecognised_document() {
        assert!(matches!(
            parse_schema(json!({"a": 1, "b": 2}), None),
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_schema(json!({"properties": {}}), None),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_import_stores_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapping.json");
        fs::write(
            &path,
            json!({"jobs": {"mappings": {"properties": job_properties()}}}).to_string(),
        )
        .unwrap();

        let store = MemorySettingsStore::new();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let args = SchemaArgs {
            action: SchemaAction::Import {
                file: path,
                index: None,
            },
        };
        execute_schema(args, &store, &formatter).await.unwrap();

        let schema = store.get_schema().await.unwrap();
        assert_eq!(schema.index_name, "jobs");
        assert!(!schema.last_updated.is_empty());
        assert_eq!(schema.field_type("job_title"), Some("text"));
    }
}
