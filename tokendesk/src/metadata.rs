//! Local cache of user-supplied token metadata.
//!
//! An SPL mint carries no name or symbol, so the desk remembers what the user
//! typed when the mint was created. Records are kept as one JSON list under a
//! single key of a flat [`KeyValueStore`]:
//!
//! ```json
//! [{"mintAddress":"7xKX...","name":"Test","symbol":"TST","decimals":6}]
//! ```
//!
//! The mint address is unique within the list: [`TokenMetadataCache::put`]
//! replaces an earlier record for the same mint. Records are never evicted.
//! An unreadable or corrupt store reads as empty; the failure is logged and
//! does not abort the operation that asked. Writes never replace contents
//! they could not read.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::MAX_DECIMALS;

/// Store key holding the serialized record list.
pub const TOKENS_KEY: &str = "solanaTokens";

/// Display metadata for one mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataRecord {
    /// Base58 mint address; unique within the cache.
    pub mint_address: String,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places of the mint, `0..=9`.
    pub decimals: u8,
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The stored data is not valid JSON of the expected shape.
    #[error("store contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A flat string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value);
        let serialized = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Token metadata cache over a [`KeyValueStore`].
#[derive(Debug)]
pub struct TokenMetadataCache<S> {
    store: S,
}

impl<S: KeyValueStore> TokenMetadataCache<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Looks up the record for `mint_address`.
    #[must_use]
    pub fn get(&self, mint_address: &str) -> Option<TokenMetadataRecord> {
        self.all()
            .into_iter()
            .find(|record| record.mint_address == mint_address)
    }

    /// Inserts `record`, replacing any record with the same mint address.
    ///
    /// Contents that cannot be read are left in place rather than overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored list cannot be read or the updated
    /// list cannot be written.
    pub fn put(&self, record: TokenMetadataRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        match records
            .iter_mut()
            .find(|existing| existing.mint_address == record.mint_address)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.store.set(TOKENS_KEY, serde_json::to_string(&records)?)
    }

    /// All readable records, in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<TokenMetadataRecord> {
        match self.load() {
            Ok(records) => records
                .into_iter()
                .filter(|record| record.decimals <= MAX_DECIMALS)
                .collect(),
            Err(e) => {
                warn_unreadable(&e);
                Vec::new()
            }
        }
    }

    /// Every stored record, including ones with out-of-range decimals.
    fn load(&self) -> Result<Vec<TokenMetadataRecord>, StoreError> {
        match self.store.get(TOKENS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

#[allow(unused_variables)] // error is needed for tracing only
fn warn_unreadable(error: &dyn std::fmt::Display) {
    #[cfg(feature = "telemetry")]
    tracing::warn!(error = %error, "Token metadata is unreadable, treating it as empty");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn record(mint: &str, name: &str, symbol: &str, decimals: u8) -> TokenMetadataRecord {
        TokenMetadataRecord {
            mint_address: mint.to_owned(),
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            decimals,
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tokendesk-{tag}-{}-{nanos}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let cache = TokenMetadataCache::new(MemoryStore::new());
        cache.put(record("MintA", "Test", "TST", 6)).unwrap();
        let found = cache.get("MintA").unwrap();
        assert_eq!(found.name, "Test");
        assert_eq!(found.symbol, "TST");
        assert_eq!(found.decimals, 6);
    }

    #[test]
    fn test_get_is_idempotent() {
        let cache = TokenMetadataCache::new(MemoryStore::new());
        cache.put(record("MintA", "Test", "TST", 6)).unwrap();
        assert_eq!(cache.get("MintA"), cache.get("MintA"));
        assert_eq!(cache.get("Missing"), None);
        assert_eq!(cache.get("Missing"), cache.get("Missing"));
    }

    #[test]
    fn test_put_upserts_existing_mint() {
        let cache = TokenMetadataCache::new(MemoryStore::new());
        cache.put(record("MintA", "Old", "OLD", 2)).unwrap();
        cache.put(record("MintB", "Other", "OTH", 0)).unwrap();
        cache.put(record("MintA", "New", "NEW", 4)).unwrap();
        assert_eq!(cache.all().len(), 2);
        assert_eq!(cache.get("MintA").unwrap(), record("MintA", "New", "NEW", 4));
    }

    #[test]
    fn test_stored_layout_is_camel_case_list() {
        let cache = TokenMetadataCache::new(MemoryStore::new());
        cache.put(record("MintA", "Test", "TST", 6)).unwrap();
        let raw = cache.store().get(TOKENS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"mintAddress": "MintA", "name": "Test", "symbol": "TST", "decimals": 6}])
        );
    }

    #[test]
    fn test_corrupt_store_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(TOKENS_KEY, "not json".to_owned()).unwrap();
        let cache = TokenMetadataCache::new(store);
        assert!(cache.get("MintA").is_none());
        assert!(cache.all().is_empty());
    }

    #[test]
    fn test_put_leaves_corrupt_store_untouched() {
        let store = MemoryStore::new();
        store.set(TOKENS_KEY, "not json".to_owned()).unwrap();
        let cache = TokenMetadataCache::new(store);

        let error = cache.put(record("MintA", "Test", "TST", 6)).unwrap_err();

        assert!(matches!(error, StoreError::Corrupt(_)));
        assert_eq!(
            cache.store().get(TOKENS_KEY).unwrap().as_deref(),
            Some("not json")
        );
    }

    #[test]
    fn test_out_of_range_decimals_are_ignored() {
        let store = MemoryStore::new();
        store
            .set(
                TOKENS_KEY,
                r#"[{"mintAddress":"MintA","name":"Bad","symbol":"BAD","decimals":12}]"#.to_owned(),
            )
            .unwrap();
        let cache = TokenMetadataCache::new(store);
        assert!(cache.get("MintA").is_none());

        cache.put(record("MintB", "Good", "GD", 6)).unwrap();
        let raw = cache.store().get(TOKENS_KEY).unwrap().unwrap();
        assert!(raw.contains("MintA"));
        assert_eq!(cache.all(), vec![record("MintB", "Good", "GD", 6)]);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("persist");
        {
            let cache = TokenMetadataCache::new(FileStore::new(&path));
            cache.put(record("MintA", "Test", "TST", 6)).unwrap();
        }
        let cache = TokenMetadataCache::new(FileStore::new(&path));
        assert_eq!(cache.get("MintA").unwrap().symbol, "TST");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert!(store.get(TOKENS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let path = temp_path("keys");
        let store = FileStore::new(&path);
        store.set("other", "value".to_owned()).unwrap();
        store.set(TOKENS_KEY, "[]".to_owned()).unwrap();
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
        std::fs::remove_file(&path).unwrap();
    }
}
