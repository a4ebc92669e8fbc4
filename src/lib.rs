//! `TourGuide` - cultural tourism assistant
//!
//! This library provides a catalog of points of interest with proximity
//! search, a persisted favorites index, and a keyword-driven voice assistant
//! that answers free-text commands about nearby places, their history and
//! how to get there.

pub mod api;
pub mod app;
pub mod assistant;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod poi;
pub mod storage;
pub mod web;

// Re-export core types for public API
pub use app::TourGuide;
pub use assistant::{AssistantResponse, Intent, IntentCategory, IntentClassifier, VoiceAssistant};
pub use config::TourGuideConfig;
pub use error::TourGuideError;
pub use favorites::FavoritesIndex;
pub use models::{Coordinates, Poi};
pub use poi::{NearbyPoi, PoiStore, ProximityQuery};
pub use storage::{FjallStore, KeyValueStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TourGuideError>;
