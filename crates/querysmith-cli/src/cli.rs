//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Querysmith CLI - Turn natural-language requests into Elasticsearch queries.
#[derive(Debug, Parser)]
#[command(name = "querysmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Settings database path
    #[arg(long, global = true, env = "QUERYSMITH_DB")]
    pub db: Option<PathBuf>,

    /// API key overriding the stored one
    #[arg(long, global = true, env = "QUERYSMITH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (best query only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a query for a natural-language request
    Ask(AskArgs),

    /// Manage the completion provider settings
    Config(ConfigArgs),

    /// Manage the index schema
    Schema(SchemaArgs),

    /// Manage the example query corpus
    Corpus(CorpusArgs),

    /// Turn debug logs on or off
    Debug(DebugArgs),

    /// List supported completion providers
    Providers,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Request text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Include the agent logs for this request
    #[arg(short, long)]
    pub debug: bool,

    /// Show every candidate, not just the best
    #[arg(short, long)]
    pub all: bool,
}

impl AskArgs {
    /// The request as one string.
    pub fn request(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for provider settings.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Provider settings actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the stored settings
    Show,

    /// Select the provider
    SetProvider {
        /// Provider id (gemini, openai, anthropic, ollama)
        provider: String,
    },

    /// Select the model
    SetModel {
        /// Model name
        model: String,
    },

    /// Store the API key
    SetKey {
        /// API key
        key: String,
    },

    /// Override the provider endpoint, or clear the override
    SetUrl {
        /// Base URL
        url: Option<String>,
    },

    /// Check that the configured model answers
    Test,
}

/// Arguments for schema management.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

/// Schema actions.
#[derive(Debug, Subcommand)]
pub enum SchemaAction {
    /// Import a schema or an index mapping from a JSON file
    Import {
        /// JSON file
        file: PathBuf,

        /// Index name, overriding the one in the file
        #[arg(short, long)]
        index: Option<String>,
    },

    /// Show the stored schema
    Show,
}

/// Arguments for corpus management.
#[derive(Debug, Parser)]
pub struct CorpusArgs {
    #[command(subcommand)]
    pub action: CorpusAction,
}

/// Corpus actions.
#[derive(Debug, Subcommand)]
pub enum CorpusAction {
    /// Import sample queries from a JSON array file
    Import {
        /// JSON file
        file: PathBuf,

        /// Merge into the stored corpus instead of replacing it
        #[arg(long)]
        append: bool,
    },

    /// List the stored sample queries
    List,
}

/// Arguments for the debug command.
#[derive(Debug, Parser)]
pub struct DebugArgs {
    /// New debug state
    #[arg(value_enum)]
    pub state: Toggle,
}

/// On/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Toggle {
    /// Enabled
    On,
    /// Disabled
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_enters_repl() {
        let cli = Cli::try_parse_from(["querysmith"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_command() {
        let cli = Cli::try_parse_from([
            "querysmith",
            "ask",
            "rust",
            "jobs",
            "in",
            "Berlin",
            "--all",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Some(Command::Ask(args)) => {
                assert_eq!(args.request(), "rust jobs in Berlin");
                assert!(args.all);
                assert!(!args.debug);
            }
            other => panic!("Expected Ask command, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["querysmith", "ask"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["querysmith", "config", "set-provider", "openai"]).unwrap();
        match cli.command {
            Some(Command::Config(ConfigArgs {
                action: ConfigAction::SetProvider { provider },
            })) => assert_eq!(provider, "openai"),
            other => panic!("Expected SetProvider, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["querysmith", "config", "set-url"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigArgs {
                action: ConfigAction::SetUrl { url: None }
            }))
        ));
    }

    #[test]
    fn test_debug_toggle() {
        let cli = Cli::try_parse_from(["querysmith", "debug", "on"]).unwrap();
        match cli.command {
            Some(Command::Debug(args)) => assert!(bool::from(args.state)),
            other => panic!("Expected Debug command, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["querysmith", "debug", "maybe"]).is_err());
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, crate::config::OutputFormat::Quiet);
    }
}
