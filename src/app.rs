//! Wiring of the catalog, favorites and assistant from configuration

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::Result;
use crate::assistant::VoiceAssistant;
use crate::config::TourGuideConfig;
use crate::favorites::FavoritesIndex;
use crate::poi::{PoiStore, ProximityQuery};
use crate::storage::{FjallStore, KeyValueStore, MemoryStore};

/// Shared handles to every core service
#[derive(Clone)]
pub struct TourGuide {
    pub catalog: Arc<PoiStore>,
    pub proximity: ProximityQuery,
    pub favorites: Arc<FavoritesIndex>,
    pub assistant: Arc<VoiceAssistant>,
    pub default_radius_km: f64,
}

impl TourGuide {
    /// Build services backed by the configured catalog and on-disk store
    pub fn from_config(config: &TourGuideConfig) -> Result<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => PoiStore::load(path)?,
            None => PoiStore::builtin()?,
        };

        std::fs::create_dir_all(&config.storage.path)?;
        let store = FjallStore::open(&config.storage.path)?;

        let guide = Self::assemble(Arc::new(catalog), Arc::new(store), config);
        info!(
            "TourGuide ready with {} points of interest",
            guide.catalog.len()
        );
        Ok(guide)
    }

    /// Builtin catalog with in-memory favorites and no processing delay
    pub fn ephemeral() -> Result<Self> {
        let mut config = TourGuideConfig::default();
        config.assistant.processing_delay_ms = 0;
        Ok(Self::assemble(
            Arc::new(PoiStore::builtin()?),
            Arc::new(MemoryStore::new()),
            &config,
        ))
    }

    pub(crate) fn assemble(
        catalog: Arc<PoiStore>,
        store: Arc<dyn KeyValueStore>,
        config: &TourGuideConfig,
    ) -> Self {
        let proximity = ProximityQuery::new(catalog.clone())
            .with_fallback(config.proximity.fallback_to_catalog)
            .with_demo_scatter(config.proximity.demo_scatter);

        let favorites = FavoritesIndex::new(store, catalog.clone())
            .with_key(config.storage.favorites_key.clone());

        let assistant = VoiceAssistant::new(proximity.clone())
            .with_position(config.assistant.position())
            .with_search_radius(config.proximity.default_radius_km)
            .with_processing_delay(config.assistant.processing_delay());

        Self {
            catalog,
            proximity,
            favorites: Arc::new(favorites),
            assistant: Arc::new(assistant),
            default_radius_km: config.proximity.default_radius_km,
        }
    }

    /// Same services with a different assistant delay
    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.assistant = Arc::new((*self.assistant).clone().with_processing_delay(delay));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_uses_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TourGuideConfig::default();
        config.storage.path = dir.path().join("store").to_string_lossy().into_owned();
        config.storage.favorites_key = "test_favorites".to_string();

        let guide = TourGuide::from_config(&config).unwrap();
        assert_eq!(guide.catalog.len(), 5);
        assert_eq!(guide.favorites.key(), "test_favorites");

        assert!(guide.favorites.toggle_favorite("4").await.unwrap());
        assert!(guide.favorites.is_favorite("4").await);
    }

    #[tokio::test]
    async fn test_from_config_with_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"[{"id":"a","name":"Old Mill","location":"Riverside","latitude":1.0,"longitude":2.0,
                "shortDescription":"A mill","description":"An old mill.","imageUrl":""}]"#,
        )
        .unwrap();

        let mut config = TourGuideConfig::default();
        config.storage.path = dir.path().join("store").to_string_lossy().into_owned();
        config.catalog.path = Some(catalog_path.to_string_lossy().into_owned());

        let guide = TourGuide::from_config(&config).unwrap();
        assert_eq!(guide.catalog.get_by_id("a").unwrap().name, "Old Mill");
    }

    #[tokio::test]
    async fn test_ephemeral_answers_immediately() {
        let guide = TourGuide::ephemeral().unwrap();
        let response = guide.assistant.process("where am i").await;
        assert!(response.response_text.contains("Times Square"));
    }
}
