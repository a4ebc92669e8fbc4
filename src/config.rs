//! Configuration management for the `TourGuide` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TourGuideError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `TourGuide` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TourGuideConfig {
    /// Favorites persistence settings
    pub storage: StorageConfig,
    /// POI catalog source
    pub catalog: CatalogConfig,
    /// Proximity search settings
    pub proximity: ProximityConfig,
    /// Voice assistant settings
    pub assistant: AssistantConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// Favorites persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the on-disk key-value store
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Key the favorites set is stored under
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
}

/// POI catalog source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the builtin landmarks are used when unset
    pub path: Option<String>,
}

/// Proximity search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Search radius in kilometers
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Return the whole catalog when nothing is within the radius
    #[serde(default = "default_true")]
    pub fallback_to_catalog: bool,
    /// Scatter results around the query point (map demos only)
    #[serde(default)]
    pub demo_scatter: bool,
}

/// Voice assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Simulated processing delay in milliseconds
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    /// Latitude of the current position
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Longitude of the current position
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("tourguide").join("store"))
        .unwrap_or_else(|| PathBuf::from(".tourguide"))
        .to_string_lossy()
        .into_owned()
}

fn default_favorites_key() -> String {
    crate::favorites::DEFAULT_FAVORITES_KEY.to_string()
}

fn default_radius_km() -> f64 {
    crate::poi::ProximityQuery::DEFAULT_RADIUS_KM
}

fn default_true() -> bool {
    true
}

fn default_processing_delay_ms() -> u64 {
    1500
}

fn default_latitude() -> f64 {
    crate::assistant::responder::DEFAULT_POSITION.latitude
}

fn default_longitude() -> f64 {
    crate::assistant::responder::DEFAULT_POSITION.longitude
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            favorites_key: default_favorites_key(),
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            fallback_to_catalog: true,
            demo_scatter: false,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl AssistantConfig {
    #[must_use]
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl TourGuideConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as TOURGUIDE_STORAGE__PATH
        builder = builder.add_source(
            Environment::with_prefix("TOURGUIDE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TourGuideConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tourguide").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.storage.path.is_empty() {
            self.storage.path = default_storage_path();
        }
        if self.storage.favorites_key.is_empty() {
            self.storage.favorites_key = default_favorites_key();
        }
        if self.proximity.default_radius_km == 0.0 {
            self.proximity.default_radius_km = default_radius_km();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let radius = self.proximity.default_radius_km;
        if !radius.is_finite() || radius < 0.0 {
            return Err(TourGuideError::config("Search radius must be a positive number").into());
        }

        if radius > 500.0 {
            return Err(TourGuideError::config("Search radius cannot exceed 500 km").into());
        }

        if self.assistant.processing_delay_ms > 60_000 {
            return Err(TourGuideError::config(
                "Assistant processing delay cannot exceed 60000 ms",
            )
            .into());
        }

        Coordinates::validated(self.assistant.latitude, self.assistant.longitude)
            .map_err(|e| TourGuideError::config(format!("Invalid assistant position: {e}")))?;

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TourGuideError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TourGuideError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.storage.favorites_key.contains(char::is_whitespace) {
            return Err(
                TourGuideError::config("Favorites key cannot contain whitespace").into(),
            );
        }

        Ok(())
    }
}
