//! Configuration management for geoinspect.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::sync::OnceLock;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inspection::{is_palette_color, Coordinate, MarkerIcon, DEFAULT_COLOR, PALETTE};
use crate::store::{StoreSettings, DEFAULT_ALBUM, DEFAULT_STORAGE_KEY};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "geoinspect";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "inspections.db";

/// Default images subdirectory of the data directory.
const IMAGES_DIR_NAME: &str = "images";

/// Default gallery subdirectory of the data directory.
const GALLERY_DIR_NAME: &str = "gallery";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GEOINSPECT_`, sections split on `__`)
/// 2. TOML config file at `~/.config/geoinspect/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Image relocation configuration.
    pub images: ImagesConfig,
    /// Media library configuration.
    pub media: MediaConfig,
    /// Map configuration.
    pub map: MapConfig,
    /// Marker defaults for new inspections.
    pub markers: MarkersConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/geoinspect/inspections.db`
    pub database_path: Option<PathBuf>,
    /// Key under which the inspection collection is stored.
    pub storage_key: String,
}

/// Image relocation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory picked images are moved into.
    /// Defaults to `~/.local/share/geoinspect/images`
    pub images_dir: Option<PathBuf>,
    /// Media library album relocated images are added to.
    pub album: String,
}

/// Media library configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Gallery directory backing the media library.
    /// Defaults to `~/.local/share/geoinspect/gallery`
    pub gallery_dir: Option<PathBuf>,
    /// Whether the media library grants write access.
    pub permission_granted: bool,
}

/// Map configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude used when no location is given.
    pub default_latitude: f64,
    /// Longitude used when no location is given.
    pub default_longitude: f64,
}

/// Marker defaults for new inspections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Marker color preselected for new inspections.
    pub default_color: String,
    /// Marker icon preselected for new inspections.
    pub default_icon: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            images_dir: None,
            album: DEFAULT_ALBUM.to_string(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            gallery_dir: None,
            permission_granted: true,
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            default_icon: MarkerIcon::Default.name().to_string(),
        }
    }
}

/// Syntax of a marker color.
const HEX_COLOR_PATTERN: &str = r"^#[0-9A-Fa-f]{6}$";

fn hex_color_regex() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    // constant pattern, covered by test_hex_color_pattern
    HEX_COLOR.get_or_init(|| Regex::new(HEX_COLOR_PATTERN).expect("Invalid regex pattern"))
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GEOINSPECT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage_key must not be empty".to_string(),
            });
        }

        if self.images.album.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "album must not be empty".to_string(),
            });
        }

        if !self.default_location().is_valid() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default location ({}, {}) is out of range",
                    self.map.default_latitude, self.map.default_longitude
                ),
            });
        }

        if !hex_color_regex().is_match(&self.markers.default_color) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_color must be a #RRGGBB hex color: {}",
                    self.markers.default_color
                ),
            });
        }

        if !is_palette_color(&self.markers.default_color) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_color {} is not one of the marker colors: {}",
                    self.markers.default_color,
                    PALETTE.join(", ")
                ),
            });
        }

        if MarkerIcon::from_name(&self.markers.default_icon).is_none() {
            return Err(Error::ConfigValidation {
                message: format!("unknown default_icon: {}", self.markers.default_icon),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the images directory, resolving defaults if not set.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.images
            .images_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(IMAGES_DIR_NAME))
    }

    /// Get the gallery directory, resolving defaults if not set.
    #[must_use]
    pub fn gallery_dir(&self) -> PathBuf {
        self.media
            .gallery_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(GALLERY_DIR_NAME))
    }

    /// The location used when none is supplied.
    #[must_use]
    pub fn default_location(&self) -> Coordinate {
        Coordinate::new(self.map.default_latitude, self.map.default_longitude)
    }

    /// Settings for the inspection store.
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            storage_key: self.storage.storage_key.clone(),
            images_dir: self.images_dir(),
            album: self.images.album.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.storage_key, "inspections");
        assert_eq!(config.images.album, "Pictures");
        assert!(config.media.permission_granted);
        assert_eq!(config.markers.default_color, "#D32F2F");
        assert_eq!(config.markers.default_icon, "default");
    }

    #[test]
    fn test_default_paths_unset() {
        let config = Config::default();
        assert!(config.storage.database_path.is_none());
        assert!(config.images.images_dir.is_none());
        assert!(config.media.gallery_dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_storage_key() {
        let mut config = Config::default();
        config.storage.storage_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage_key"));
    }

    #[test]
    fn test_validate_empty_album() {
        let mut config = Config::default();
        config.images.album = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("album"));
    }

    #[test]
    fn test_validate_out_of_range_location() {
        let mut config = Config::default();
        config.map.default_latitude = 123.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_validate_bad_color() {
        let mut config = Config::default();
        config.markers.default_color = "red".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_color"));

        config.markers.default_color = "#1976d2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_color_outside_palette() {
        let mut config = Config::default();
        config.markers.default_color = "#000000".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("not one of the marker colors"));
        assert!(err.contains("#D32F2F"));
    }

    #[test]
    fn test_every_palette_color_is_a_valid_default() {
        for color in PALETTE {
            let mut config = Config::default();
            config.markers.default_color = color.to_string();
            assert!(config.validate().is_ok(), "{color} rejected");

            let details = crate::wizard::InspectionDetails {
                marker_color: color.to_string(),
                ..Default::default()
            };
            assert!(details.validate().is_ok());
        }
    }

    #[test]
    fn test_hex_color_pattern() {
        let re = hex_color_regex();
        assert!(re.is_match("#A1b2C3"));
        assert!(!re.is_match("#12345"));
        assert!(!re.is_match("123456"));
    }

    #[test]
    fn test_validate_unknown_icon() {
        let mut config = Config::default();
        config.markers.default_icon = "rocket".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_icon"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("inspections.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_images_and_gallery_defaults() {
        let config = Config::default();
        assert!(config.images_dir().ends_with("geoinspect/images"));
        assert!(config.gallery_dir().ends_with("geoinspect/gallery"));
    }

    #[test]
    fn test_store_settings() {
        let mut config = Config::default();
        config.images.images_dir = Some(PathBuf::from("/data/images"));
        config.images.album = "Inspections".to_string();

        let settings = config.store_settings();
        assert_eq!(settings.storage_key, "inspections");
        assert_eq!(settings.images_dir, PathBuf::from("/data/images"));
        assert_eq!(settings.album, "Inspections");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("geoinspect"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "geoinspect.toml",
                r##"
                [storage]
                storage_key = "site-visits"

                [images]
                album = "Site Visits"

                [map]
                default_latitude = 45.5
                default_longitude = -73.6

                [markers]
                default_color = "#388E3C"
                default_icon = "tree"
                "##,
            )?;

            let config = Config::load_from(Some(PathBuf::from("geoinspect.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.storage_key, "site-visits");
            assert_eq!(config.images.album, "Site Visits");
            assert_eq!(config.default_location(), Coordinate::new(45.5, -73.6));
            assert_eq!(config.markers.default_icon, "tree");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "geoinspect.toml",
                r#"
                [media]
                permission_granted = true
                "#,
            )?;
            jail.set_env("GEOINSPECT_MEDIA__PERMISSION_GRANTED", "false");
            jail.set_env("GEOINSPECT_STORAGE__STORAGE_KEY", "from-env");

            let config = Config::load_from(Some(PathBuf::from("geoinspect.toml")))
                .map_err(|e| e.to_string())?;
            assert!(!config.media.permission_granted);
            assert_eq!(config.storage.storage_key, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "geoinspect.toml",
                r#"
                [markers]
                default_icon = "rocket"
                "#,
            )?;

            let result = Config::load_from(Some(PathBuf::from("geoinspect.toml")));
            assert!(result.is_err());
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("storage_key"));
        assert!(json.contains("permission_granted"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"storage_key": "custom"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.storage_key, "custom");
        assert!(storage.database_path.is_none());
    }
}
