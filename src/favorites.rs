//! Favorites index
//!
//! Keeps the set of bookmarked POI identifiers in a [`KeyValueStore`] as a
//! JSON array under a single key. Every mutation is a single
//! [`KeyValueStore::update`], so indexes sharing a store never lose each
//! other's writes.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::Poi;
use crate::poi::PoiStore;
use crate::storage::{KeyValueStore, boxed_update};
use crate::{Result, TourGuideError};

pub const DEFAULT_FAVORITES_KEY: &str = "user_favorites";

/// Persisted set of favorite POI identifiers
pub struct FavoritesIndex {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<PoiStore>,
    key: String,
}

impl FavoritesIndex {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<PoiStore>) -> Self {
        Self {
            store,
            catalog,
            key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }

    /// Store the set under a different key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Namespace the set for one user or device (`"{key}:{scope}"`)
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.key = format!("{}:{scope}", self.key);
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether `id` is currently bookmarked. Unreadable storage counts as empty.
    pub async fn is_favorite(&self, id: &str) -> bool {
        self.load_ids().await.iter().any(|fav| fav == id)
    }

    /// Flip membership of `id` and return the new state.
    ///
    /// A stored value that is not a JSON id list is logged and replaced.
    #[tracing::instrument(name = "toggle_favorite", level = "debug", skip(self))]
    pub async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let key = self.key.clone();
        let target = id.to_string();
        let stored = self
            .store
            .update(
                &self.key,
                boxed_update(move |current| {
                    let mut ids = match current.as_deref().map(decode_ids).transpose() {
                        Ok(ids) => ids.unwrap_or_default(),
                        Err(e) => {
                            warn!("Discarding unreadable favorites under {}: {}", key, e);
                            Vec::new()
                        }
                    };
                    let position = ids.iter().position(|fav| *fav == target);
                    match position {
                        Some(position) => {
                            ids.remove(position);
                        }
                        None => ids.push(target),
                    }
                    Ok(Some(serde_json::to_vec(&ids)?))
                }),
            )
            .await?;

        let is_favorite = match stored {
            Some(bytes) => decode_ids(&bytes)?.iter().any(|fav| fav == id),
            None => false,
        };
        info!(
            "{} favorite {}",
            if is_favorite { "Added" } else { "Removed" },
            id
        );
        Ok(is_favorite)
    }

    /// Raw identifiers in the persisted set
    pub async fn favorite_ids(&self) -> Vec<String> {
        self.load_ids().await
    }

    /// Favorite POIs hydrated from the catalog.
    ///
    /// Identifiers the catalog no longer knows are skipped and pruned.
    pub async fn list_favorites(&self) -> Vec<Poi> {
        let ids = self.load_ids().await;
        let mut favorites = Vec::with_capacity(ids.len());
        let mut stale = Vec::new();

        for id in ids {
            match self.catalog.get_by_id(&id) {
                Ok(poi) => favorites.push(poi.clone()),
                Err(TourGuideError::NotFound { .. }) => stale.push(id),
                Err(e) => warn!("Failed to resolve favorite {}: {}", id, e),
            }
        }

        if !stale.is_empty() {
            if let Err(e) = self.prune(stale.clone()).await {
                warn!("Failed to prune stale favorites {:?}: {}", stale, e);
            }
        }

        favorites
    }

    /// Remove every favorite
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(&self.key).await?;
        info!("Cleared favorites under key {}", self.key);
        Ok(())
    }

    async fn prune(&self, stale: Vec<String>) -> Result<()> {
        self.store
            .update(
                &self.key,
                boxed_update(move |current| {
                    let Some(bytes) = current else {
                        return Ok(None);
                    };
                    let ids = decode_ids(&bytes)?;
                    let kept: Vec<&String> = ids.iter().filter(|id| !stale.contains(*id)).collect();
                    if kept.len() == ids.len() {
                        return Ok(None);
                    }
                    debug!("Pruning {} stale favorites", ids.len() - kept.len());
                    Ok(Some(serde_json::to_vec(&kept)?))
                }),
            )
            .await?;
        Ok(())
    }

    async fn load_ids(&self) -> Vec<String> {
        match self.read_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Error reading favorites, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn read_ids(&self) -> Result<Vec<String>> {
        match self.store.get(&self.key).await? {
            Some(bytes) => decode_ids(&bytes),
            None => Ok(Vec::new()),
        }
    }
}

/// Decode a stored id list. Duplicates left by older writers collapse.
fn decode_ids(bytes: &[u8]) -> Result<Vec<String>> {
    let ids: Vec<String> = serde_json::from_slice(bytes)?;
    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
}
