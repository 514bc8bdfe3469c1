//! Example corpus command implementation.

use crate::cli::{CorpusAction, CorpusArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{SampleQuery, SettingsStore};
use querysmith_store::StoreError;
use std::collections::HashSet;
use std::fs;

/// Execute the corpus command.
pub async fn execute_corpus<S>(args: CorpusArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: SettingsStore<Error = StoreError>,
{
    match args.action {
        CorpusAction::List => {
            let corpus = store.get_example_corpus().await?;
            println!("{}", formatter.format_corpus(&corpus)?);
        }
        CorpusAction::Import { file, append } => {
            let contents = fs::read_to_string(&file)?;
            let incoming: Vec<SampleQuery> = serde_json::from_str(&contents)?;
            check_ids(&incoming)?;
            let count = incoming.len();

            let corpus = if append {
                merge_corpus(store.get_example_corpus().await?, incoming)
            } else {
                incoming
            };
            store.set_example_corpus(&corpus).await?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Imported {} sample quer{} ({} stored)",
                    count,
                    if count == 1 { "y" } else { "ies" },
                    corpus.len()
                ))
            );
        }
    }
    Ok(())
}

/// Reject blank or repeated ids.
fn check_ids(samples: &[SampleQuery]) -> Result<()> {
    let mut seen = HashSet::new();
    for sample in samples {
        if sample.id.trim().is_empty() {
            return Err(CliError::InvalidInput("Sample query id must not be empty".to_string()));
        }
        if !seen.insert(sample.id.as_str()) {
            return Err(CliError::InvalidInput(format!(
                "Duplicate sample query id: {}",
                sample.id
            )));
        }
    }
    Ok(())
}

/// Merge `incoming` into `existing`; an incoming sample replaces the stored
/// one with the same id in place, new ids are appended.
pub fn merge_corpus(mut existing: Vec<SampleQuery>, incoming: Vec<SampleQuery>) -> Vec<SampleQuery> {
    for sample in incoming {
        match existing.iter_mut().find(|s| s.id == sample.id) {
            Some(slot) => *slot = sample,
            None => existing.push(sample),
        }
    }
    existing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use querysmith_store::MemorySettingsStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample(id: &str, description: &str) -> SampleQuery {
        SampleQuery {
            id: id.to_string(),
            description: description.to_string(),
            user_intent: "jobs".to_string(),
            query: json!({"query": {"match_all": {}}}),
            tags: vec!["company".to_string()],
            complexity: "simple".to_string(),
            success_rate: 0.9,
            business_context: None,
            performance_notes: None,
        }
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let existing = vec![sample("a", "old"), sample("b", "kept")];
        let merged = merge_corpus(existing, vec![sample("a", "new"), sample("c", "added")]);

        let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(merged[0].description, "new");
    }

    #[test]
    fn test_check_ids() {
        assert!(check_ids(&[sample("a", ""), sample("b", "")]).is_ok());
        assert!(check_ids(&[sample("a", ""), sample("a", "")]).is_err());
        assert!(check_ids(&[sample(" ", "")]).is_err());
    }

    #[tokio::test]
    async fn test_import_replace_and_append() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        fs::write(&first, serde_json::to_string(&[sample("a", "one")]).unwrap()).unwrap();
        fs::write(&second, serde_json::to_string(&[sample("b", "two")]).unwrap()).unwrap();

        let store = MemorySettingsStore::new();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let import = |file, append| CorpusArgs {
            action: CorpusAction::Import { file, append },
        };

        execute_corpus(import(first, false), &store, &formatter)
            .await
            .unwrap();
        execute_corpus(import(second.clone(), true), &store, &formatter)
            .await
            .unwrap();
        assert_eq!(store.get_example_corpus().await.unwrap().len(), 2);

        execute_corpus(import(second, false), &store, &formatter)
            .await
            .unwrap();
        let corpus = store.get_example_corpus().await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].id, "b");
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let store = MemorySettingsStore::new();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = execute_corpus(
            CorpusArgs {
                action: CorpusAction::Import {
                    file: path,
                    append: false,
                },
            },
            &store,
            &formatter,
        )
        .await;
        assert!(matches!(result, Err(CliError::Serialization(_))));
    }
}
