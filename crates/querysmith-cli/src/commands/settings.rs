//! Provider settings command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{CompletionConfig, ProviderKind, SettingsStore};
use querysmith_llm::{descriptor, HttpCompletionService};
use querysmith_store::StoreError;

/// Execute the config command.
pub async fn execute_config<S>(
    args: ConfigArgs,
    api_key: Option<&str>,
    store: &S,
    formatter: &Formatter,
) -> Result<()>
where
    S: SettingsStore<Error = StoreError>,
{
    let mut config = store.get_config().await?;

    let message = match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.format_completion_config(&config)?);
            return Ok(());
        }
        ConfigAction::Test => {
            if let Some(key) = api_key {
                config.api_key = Some(key.to_string());
            }
            config.validate().map_err(CliError::Config)?;
            let service = HttpCompletionService::new()?;
            if service.check_connection(&config).await {
                println!(
                    "{}",
                    formatter.success(&format!("{} ({}) is responding", config.provider, config.model))
                );
            } else {
                println!(
                    "{}",
                    formatter.error(&format!("{} ({}) did not answer", config.provider, config.model))
                );
            }
            return Ok(());
        }
        ConfigAction::SetProvider { provider } => set_provider(&mut config, &provider)?,
        ConfigAction::SetModel { model } => {
            let model = model.trim();
            if model.is_empty() {
                return Err(CliError::InvalidInput("Model name must not be empty".to_string()));
            }
            config.model = model.to_string();
            format!("Model set to {}", config.model)
        }
        ConfigAction::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::InvalidInput("API key must not be empty".to_string()));
            }
            config.api_key = Some(key.to_string());
            format!("API key stored for {}", config.provider)
        }
        ConfigAction::SetUrl { url } => {
            config.base_url = url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty());
            match &config.base_url {
                Some(url) => format!("Base URL set to {}", url),
                None => "Base URL override cleared".to_string(),
            }
        }
    };

    store.set_config(&config).await?;
    println!("{}", formatter.success(&message));
    Ok(())
}

/// Switch provider, moving to its first known model when the current one
/// belongs to another provider.
fn set_provider(config: &mut CompletionConfig, provider: &str) -> Result<String> {
    let kind: ProviderKind = provider
        .parse()
        .map_err(|e: querysmith_domain::UnsupportedProvider| CliError::InvalidInput(e.to_string()))?;
    config.provider = kind;

    let models = descriptor(kind).models;
    match models.first() {
        Some(first) if !models.contains(&config.model.as_str()) => {
            config.model = first.to_string();
            Ok(format!("Provider set to {} (model {})", kind, config.model))
        }
        _ => Ok(format!("Provider set to {}", kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use querysmith_store::MemorySettingsStore;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    async fn run(store: &MemorySettingsStore, action: ConfigAction) -> Result<()> {
        execute_config(ConfigArgs { action }, None, store, &formatter()).await
    }

    #[test]
    fn test_set_provider_switches_model() {
        let mut config = CompletionConfig::default();
        let message = set_provider(&mut config, "OpenAI").unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, descriptor(ProviderKind::OpenAi).models[0]);
        assert!(message.contains("openai"));
    }

    #[test]
    fn test_set_provider_keeps_known_model() {
        let mut config = CompletionConfig::default();
        let model = descriptor(ProviderKind::Anthropic).models[0];
        config.model = model.to_string();

        set_provider(&mut config, "anthropic").unwrap();
        assert_eq!(config.model, model);
    }

    #[test]
    fn test_unknown_provider() {
        let mut config = CompletionConfig::default();
        let err = set_provider(&mut config, "cohere").unwrap_err();
        assert!(err.to_string().contains("Unsupported LLM provider: cohere"));
        assert_eq!(config, CompletionConfig::default());
    }

    #[tokio::test]
    async fn test_updates_are_stored() {
        let store = MemorySettingsStore::new();

        run(&store, ConfigAction::SetModel { model: " llama3 ".to_string() })
            .await
            .unwrap();
        run(&store, ConfigAction::SetKey { key: "secret".to_string() })
            .await
            .unwrap();
        run(
            &store,
            ConfigAction::SetUrl {
                url: Some("http://localhost:11434".to_string()),
            },
        )
        .await
        .unwrap();

        let config = store.get_config().await.unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:11434"));

        run(&store, ConfigAction::SetUrl { url: None }).await.unwrap();
        assert!(store.get_config().await.unwrap().base_url.is_none());
    }

    #[tokio::test]
    async fn test_empty_values_rejected() {
        let store = MemorySettingsStore::new();
        assert!(matches!(
            run(&store, ConfigAction::SetModel { model: "  ".to_string() }).await,
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(
            run(&store, ConfigAction::SetKey { key: String::new() }).await,
            Err(CliError::InvalidInput(_))
        ));
        assert_eq!(store.get_config().await.unwrap(), CompletionConfig::default());
    }
}
