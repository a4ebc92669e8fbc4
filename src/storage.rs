//! Key-value persistence used by the favorites index

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fjall::Keyspace;
use tokio::task;

use crate::{Result, TourGuideError};

/// Read-modify-write step for [`KeyValueStore::update`].
///
/// Receives the current value and returns the replacement, or `None` to
/// leave the value untouched.
pub type Update = Box<dyn FnOnce(Option<Vec<u8>>) -> Result<Option<Vec<u8>>> + Send>;

pub fn boxed_update<F>(update: F) -> Update
where
    F: FnOnce(Option<Vec<u8>>) -> Result<Option<Vec<u8>>> + Send + 'static,
{
    Box::new(update)
}

/// Minimal async key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;

    /// Apply `update` to the value under `key` with no other write in between.
    /// Returns the value stored afterwards.
    async fn update(&self, key: &str, update: Update) -> Result<Option<Vec<u8>>>;
}

fn storage_error(err: impl std::fmt::Display) -> TourGuideError {
    TourGuideError::storage(err.to_string())
}

/// On-disk store backed by a fjall keyspace
#[derive(Clone)]
pub struct FjallStore {
    store: Keyspace,
    write_lock: Arc<Mutex<()>>,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key).map_err(storage_error)?.map(|v| v.to_vec()))
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open().map_err(storage_error)?;
        let items = db
            .keyspace("favorites", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_error)?;
        tracing::info!("Opened favorites store at {:?}", path.as_ref());
        Ok(FjallStore {
            store: items,
            write_lock: Arc::new(Mutex::new(())),
        })
    }
}

#[async_trait]
impl KeyValueStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || get_from_store(store, key))
            .await
            .map_err(storage_error)?
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self, value))]
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        let lock = self.write_lock.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || {
            let _guard = lock.lock().map_err(storage_error)?;
            store.insert(key, value).map_err(storage_error)
        })
        .await
        .map_err(storage_error)?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let lock = self.write_lock.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || {
            let _guard = lock.lock().map_err(storage_error)?;
            store.remove(key).map_err(storage_error)
        })
        .await
        .map_err(storage_error)?
    }

    #[tracing::instrument(name = "update_store", level = "debug", skip(self, update))]
    async fn update(&self, key: &str, update: Update) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let lock = self.write_lock.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || {
            let _guard = lock.lock().map_err(storage_error)?;
            let current = get_from_store(store.clone(), key.clone())?;
            match update(current.clone())? {
                Some(value) => {
                    store.insert(key, value.clone()).map_err(storage_error)?;
                    Ok(Some(value))
                }
                None => Ok(current),
            }
        })
        .await
        .map_err(storage_error)?
    }
}

/// Process-local store, used for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.lock().map_err(storage_error)?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.lock().map_err(storage_error)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(storage_error)?;
        entries.remove(key);
        Ok(())
    }

    async fn update(&self, key: &str, update: Update) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().map_err(storage_error)?;
        let current = entries.get(key).cloned();
        match update(current.clone())? {
            Some(value) => {
                entries.insert(key.to_string(), value.clone());
                Ok(Some(value))
            }
            None => Ok(current),
        }
    }
}
