//! End-to-end tests for the TourGuide library

use std::sync::Arc;

use tourguide::{
    Coordinates, FavoritesIndex, FjallStore, IntentCategory, PoiStore, TourGuide,
    TourGuideConfig,
};

const TIMES_SQUARE: Coordinates = Coordinates {
    latitude: 40.7580,
    longitude: -73.9855,
};

#[tokio::test]
async fn test_assistant_session_against_builtin_catalog() {
    let guide = TourGuide::ephemeral().unwrap();

    let nearby = guide.assistant.process("what museums are nearby").await;
    assert_eq!(nearby.intent.category(), IntentCategory::NearbyQuery);
    assert_eq!(nearby.referenced_poi.unwrap().id, "4");

    let history = guide.assistant.process("tell me the history of the statue of liberty").await;
    assert_eq!(history.intent.category(), IntentCategory::HistoryQuery);
    assert_eq!(history.referenced_poi.unwrap().id, "2");

    let location = guide.assistant.process("where am i").await;
    assert_eq!(location.intent.category(), IntentCategory::LocationQuery);
    assert!(location.response_text.contains("Times Square"));

    let navigation = guide.assistant.process("take me to central park").await;
    assert_eq!(navigation.intent.category(), IntentCategory::NavigationQuery);
    assert_eq!(navigation.referenced_poi.unwrap().id, "3");

    let nonsense = guide.assistant.process("sing me a song").await;
    assert_eq!(nonsense.intent.category(), IntentCategory::Unrecognized);
    assert!(nonsense.referenced_poi.is_none());
}

#[tokio::test]
async fn test_nearby_then_bookmark_results() {
    let guide = TourGuide::ephemeral().unwrap();

    let nearby = guide.proximity.nearby(&TIMES_SQUARE, 2.0).unwrap();
    let ids: Vec<&str> = nearby.iter().map(|n| n.poi.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "1"]);

    for result in &nearby {
        assert!(guide.favorites.toggle_favorite(&result.poi.id).await.unwrap());
    }

    let names: Vec<String> = guide
        .favorites
        .list_favorites()
        .await
        .into_iter()
        .map(|poi| poi.name)
        .collect();
    assert_eq!(names, vec!["Times Square", "Empire State Building"]);

    assert!(!guide.favorites.toggle_favorite("5").await.unwrap());
    assert_eq!(guide.favorites.favorite_ids().await, vec!["1".to_string()]);
}

#[tokio::test]
async fn test_favorites_persist_across_indexes_on_shared_fjall_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FjallStore::open(dir.path()).unwrap());
    let catalog = Arc::new(PoiStore::builtin().unwrap());

    let first = FavoritesIndex::new(store.clone(), catalog.clone());
    assert!(first.toggle_favorite("2").await.unwrap());
    assert!(first.toggle_favorite("3").await.unwrap());

    let second = FavoritesIndex::new(store.clone(), catalog.clone());
    assert!(second.is_favorite("2").await);
    assert!(second.is_favorite("3").await);
    assert!(!second.is_favorite("1").await);

    let other_user = FavoritesIndex::new(store, catalog).with_scope("guest");
    assert!(other_user.favorite_ids().await.is_empty());
}

#[tokio::test]
async fn test_guide_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let store_path = dir.path().join("store");
    std::fs::write(
        &config_path,
        format!(
            r#"
[storage]
path = "{}"
favorites_key = "integration"

[proximity]
default_radius_km = 2.0

[assistant]
processing_delay_ms = 0
latitude = 40.7794
longitude = -73.9632
"#,
            store_path.display()
        ),
    )
    .unwrap();

    let config = TourGuideConfig::load_from_path(Some(config_path)).unwrap();
    assert_eq!(config.proximity.default_radius_km, 2.0);

    let guide = TourGuide::from_config(&config).unwrap();
    assert_eq!(guide.favorites.key(), "integration");
    assert_eq!(guide.default_radius_km, 2.0);

    let response = guide.assistant.process("where am i").await;
    assert_eq!(response.referenced_poi.unwrap().id, "4");
}
