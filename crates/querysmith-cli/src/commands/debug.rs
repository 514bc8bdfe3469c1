//! Debug toggle and provider listing.

use crate::cli::DebugArgs;
use crate::error::Result;
use crate::output::Formatter;
use querysmith_domain::SettingsStore;
use querysmith_store::StoreError;

/// Execute the debug command.
pub async fn execute_debug<S>(args: DebugArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: SettingsStore<Error = StoreError>,
{
    let enabled = bool::from(args.state);
    store.set_debug_flag(enabled).await?;
    let state = if enabled { "on" } else { "off" };
    println!("{}", formatter.success(&format!("Debug logs {}", state)));
    Ok(())
}

/// Execute the providers command.
pub async fn execute_providers<S>(store: &S, formatter: &Formatter) -> Result<()>
where
    S: SettingsStore<Error = StoreError>,
{
    let active = store.get_config().await?.provider;
    println!(
        "{}",
        formatter.format_providers(querysmith_llm::descriptors(), active)?
    );
    Ok(())
}
