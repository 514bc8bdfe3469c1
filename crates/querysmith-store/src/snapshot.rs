//! Per-request context snapshots

use querysmith_domain::{RequestContext, SettingsStore};

/// Read everything a request needs from the store in one pass
///
/// The returned context is detached from the store: later writes do not
/// affect a request that already holds it. Both bundled stores read the four
/// settings atomically, so a concurrent `set_*` is seen entirely or not at all.
pub async fn snapshot<S: SettingsStore + ?Sized>(store: &S) -> Result<RequestContext, S::Error> {
    store.load_context().await
}
