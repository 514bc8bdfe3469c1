//! Querysmith Storage Layer
//!
//! Implements the `SettingsStore` trait over SQLite, plus an in-memory
//! variant.
//!
//! # Architecture
//!
//! - One `settings` table, one JSON document per key
//! - Absent keys read as documented defaults: default completion config,
//!   placeholder schema, empty corpus, debug off
//! - [`snapshot`] captures all four into an immutable `RequestContext`
//!
//! # Examples
//!
//! ```no_run
//! use querysmith_store::{snapshot, SqliteSettingsStore};
//!
//! # async fn example() -> Result<(), querysmith_store::StoreError> {
//! let store = SqliteSettingsStore::new("querysmith.db")?;
//! let ctx = snapshot(&store).await?;
//! println!("Target index: {}", ctx.schema.index_name);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod memory;
mod snapshot;
mod sqlite;

pub use error::StoreError;
pub use memory::MemorySettingsStore;
pub use snapshot::snapshot;
pub use sqlite::SqliteSettingsStore;

/// Keys used in the settings table
pub mod keys {
    /// Completion configuration
    pub const LLM_CONFIG: &str = "llmConfig";
    /// Index schema
    pub const SCHEMA: &str = "elasticsearchSchema";
    /// Example corpus
    pub const EXAMPLE_CORPUS: &str = "sampleQueries";
    /// Debug flag
    pub const DEBUG_MODE: &str = "debugMode";
}
