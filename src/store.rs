use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Generic keyed-collection store. Reading an absent collection yields an
/// empty sequence; writing replaces the full collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
    async fn write(&self, collection: &str, records: Vec<Value>) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn RecordStore>;

pub async fn read_records<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .read(collection)
        .await?
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(StoreError::from))
        .collect()
}

pub async fn write_records<T: Serialize>(
    store: &dyn RecordStore,
    collection: &str,
    records: &[T],
) -> Result<(), StoreError> {
    let records = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    store.write(collection, records).await
}

/// Single-file JSON store: one object keyed by collection name. Every read
/// re-reads the file and every write rewrites the whole document, so
/// concurrent processes can lose updates (last write wins); the mutex only
/// serializes access within this process.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, creating the parent directory and seeding an empty
    /// document when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        if fs::metadata(&store.path).await.is_err() {
            store.persist(&Map::new()).await?;
        }
        Ok(store)
    }

    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        match document.get(collection) {
            Some(Value::Array(records)) => Ok(records.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn write(&self, collection: &str, records: Vec<Value>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        document.insert(collection.to_string(), Value::Array(records));
        self.persist(&document).await
    }
}

/// In-memory store backed by a concurrent map. Used by tests and as an
/// ephemeral backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    async fn write(&self, collection: &str, records: Vec<Value>) -> Result<(), StoreError> {
        self.collections.insert(collection.to_string(), records);
        Ok(())
    }
}
