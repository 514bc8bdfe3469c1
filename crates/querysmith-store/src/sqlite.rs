//! SQLite-backed settings store

use crate::error::StoreError;
use crate::keys;
use async_trait::async_trait;
use querysmith_domain::{CompletionConfig, RequestContext, SampleQuery, Schema, SettingsStore};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Durable settings store over a single SQLite table
///
/// Every key holds one JSON document. Reads of absent keys return the
/// documented defaults; a stored value that no longer decodes is logged and
/// also treated as absent.
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared across
/// tasks. Operations are short and never hold the lock across an await.
pub struct SqliteSettingsStore {
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use querysmith_store::SqliteSettingsStore;
    ///
    /// let store = SqliteSettingsStore::new("querysmith.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw JSON text stored under `key`
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        read_raw(&self.conn(), key)
    }

    /// Decode the value under `key`, `None` when absent or undecodable
    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        read_item(&self.conn(), key)
    }

    /// All four request settings read inside one transaction
    pub fn read_context(&self) -> Result<RequestContext, StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let ctx = RequestContext::new(
            read_item(&tx, keys::LLM_CONFIG)?.unwrap_or_default(),
            read_item(&tx, keys::SCHEMA)?.unwrap_or_default(),
            read_item(&tx, keys::EXAMPLE_CORPUS)?.unwrap_or_default(),
            read_item(&tx, keys::DEBUG_MODE)?.unwrap_or(false),
        );
        tx.commit()?;
        Ok(ctx)
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::InvalidData("setting key must not be empty".to_string()));
        }
        let json = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, now_secs()],
        )?;
        debug!("Saved setting '{}'", key);
        Ok(())
    }

    /// Delete the value under `key`; returns whether one existed
    pub fn remove_item(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn()
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// Stored keys in lexical order
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM settings ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

fn read_raw(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn read_item<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>, StoreError> {
    let Some(raw) = read_raw(conn, key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring undecodable setting '{}': {}", key, e);
            Ok(None)
        }
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    type Error = StoreError;

    async fn get_config(&self) -> Result<CompletionConfig, Self::Error> {
        Ok(self.get_item(keys::LLM_CONFIG)?.unwrap_or_default())
    }

    async fn set_config(&self, config: &CompletionConfig) -> Result<(), Self::Error> {
        self.set_item(keys::LLM_CONFIG, config)
    }

    async fn get_schema(&self) -> Result<Schema, Self::Error> {
        Ok(self.get_item(keys::SCHEMA)?.unwrap_or_default())
    }

    async fn set_schema(&self, schema: &Schema) -> Result<(), Self::Error> {
        self.set_item(keys::SCHEMA, schema)
    }

    async fn get_example_corpus(&self) -> Result<Vec<SampleQuery>, Self::Error> {
        Ok(self.get_item(keys::EXAMPLE_CORPUS)?.unwrap_or_default())
    }

    async fn set_example_corpus(&self, corpus: &[SampleQuery]) -> Result<(), Self::Error> {
        self.set_item(keys::EXAMPLE_CORPUS, corpus)
    }

    async fn get_debug_flag(&self) -> Result<bool, Self::Error> {
        Ok(self.get_item(keys::DEBUG_MODE)?.unwrap_or(false))
    }

    async fn set_debug_flag(&self, debug: bool) -> Result<(), Self::Error> {
        self.set_item(keys::DEBUG_MODE, &debug)
    }

    async fn load_context(&self) -> Result<RequestContext, Self::Error> {
        self.read_context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip() {
        let store = SqliteSettingsStore::in_memory().unwrap();
        assert_eq!(store.get_raw("theme").unwrap(), None);

        store.set_item("theme", "dark").unwrap();
        assert_eq!(store.get_raw("theme").unwrap().as_deref(), Some("\"dark\""));

        store.set_item("theme", "light").unwrap();
        assert_eq!(store.get_item::<String>("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(store.keys().unwrap(), vec!["theme"]);
    }

    #[test]
    fn test_remove_item() {
        let store = SqliteSettingsStore::in_memory().unwrap();
        store.set_item("a", &1).unwrap();
        assert!(store.remove_item("a").unwrap());
        assert!(!store.remove_item("a").unwrap());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_empty_key_rejected() {
        let store = SqliteSettingsStore::in_memory().unwrap();
        assert!(matches!(
            store.set_item(" ", &true),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_read_context_in_one_transaction() {
        let store = SqliteSettingsStore::in_memory().unwrap();
        store.set_item(keys::DEBUG_MODE, &true).unwrap();
        store.set_item(keys::EXAMPLE_CORPUS, "not a list").unwrap();

        let ctx = store.read_context().unwrap();
        assert!(ctx.debug);
        assert!(ctx.corpus.is_empty());
        assert_eq!(ctx.config, CompletionConfig::default());

        // the connection is usable again after the transaction
        store.set_item(keys::DEBUG_MODE, &false).unwrap();
        assert!(!store.read_context().unwrap().debug);
    }

    #[test]
    fn test_undecodable_value_reads_as_absent() {
        let store = SqliteSettingsStore::in_memory().unwrap();
        store.set_item(keys::DEBUG_MODE, "yes").unwrap();
        assert_eq!(store.get_item::<bool>(keys::DEBUG_MODE).unwrap(), None);
    }
}
