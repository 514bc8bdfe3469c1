//! Command implementations.

pub mod ask;
pub mod corpus;
pub mod debug;
pub mod schema;
pub mod settings;

pub use self::ask::{build_pipeline, execute_ask, HttpPipeline};
pub use self::corpus::execute_corpus;
pub use self::debug::{execute_debug, execute_providers};
pub use self::schema::execute_schema;
pub use self::settings::execute_config;

use crate::cli::Command;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{CompletionService, SettingsStore};
use querysmith_pipeline::Pipeline;
use querysmith_store::StoreError;

/// Run one command against the settings store.
pub async fn execute<C, S>(
    command: Command,
    api_key: Option<&str>,
    store: &S,
    pipeline: &Pipeline<C>,
    formatter: &Formatter,
) -> Result<()>
where
    C: CompletionService + 'static,
    S: SettingsStore<Error = StoreError>,
{
    match command {
        Command::Ask(args) => execute_ask(args, api_key, store, pipeline, formatter).await,
        Command::Config(args) => execute_config(args, api_key, store, formatter).await,
        Command::Schema(args) => execute_schema(args, store, formatter).await,
        Command::Corpus(args) => execute_corpus(args, store, formatter).await,
        Command::Debug(args) => execute_debug(args, store, formatter).await,
        Command::Providers => execute_providers(store, formatter).await,
        Command::Repl => Err(CliError::InvalidInput("Already in the REPL".to_string())),
    }
}
