//! Querysmith CLI - natural-language requests to Elasticsearch queries.

use clap::Parser;
use querysmith_cli::commands;
use querysmith_cli::repl;
use querysmith_cli::{Cli, Command, Config, Formatter};
use querysmith_store::SqliteSettingsStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> querysmith_cli::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let db_path = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Opening settings store at {}", db_path.display());
    let store = SqliteSettingsStore::new(&db_path)?;

    let pipeline = commands::build_pipeline()?;
    let api_key = cli.api_key.as_deref();

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(
                api_key,
                &store,
                &pipeline,
                &formatter,
                config.settings.history_size,
            )
            .await?;
        }
        Some(cmd) => {
            commands::execute(cmd, api_key, &store, &pipeline, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
