/// Application configuration
///
/// Resolution order, later wins:
/// 1. built-in defaults (platform data/cache directories from `dirs`)
/// 2. the TOML file (`--config`, or `<config_dir>/traveler/config.toml` if present)
/// 3. environment: `TRAVELER_DATA_DIR`, `TRAVELER_PLACES_API_KEY`
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::discover::google::DEFAULT_BASE_URL;
use crate::discover::Coordinate;
use crate::error::{Error, Result};

const APP_DIR: &str = "traveler";
const CONFIG_FILE: &str = "config.toml";
const CATALOG_FILE: &str = "traveler.db";

/// Google rejects larger search radii
const MAX_RADIUS_M: u32 = 50_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Catalog, album documents and photo files live here
    pub data_dir: PathBuf,
    /// Thumbnails live here
    pub cache_dir: PathBuf,
    /// Used as the current location by `discover`
    pub home: Option<Coordinate>,
    pub places: PlacesConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub query: String,
    pub radius_m: u32,
    pub placeholder_url: String,
    pub base_url: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            query: "Tourist attractions".to_string(),
            // Roughly the 0.05° span the map opens with
            radius_m: 5_000,
            placeholder_url: "https://example.com/default.jpg".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// On-disk shape: everything optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    home: Option<Coordinate>,
    #[serde(default)]
    places: PlacesFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlacesFile {
    api_key: Option<String>,
    query: Option<String>,
    radius_m: Option<u32>,
    placeholder_url: Option<String>,
    base_url: Option<String>,
}

impl Config {
    /// Load from `path` (or the default location) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let contents = match path {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => default_config_path()
                .filter(|path| path.is_file())
                .map(std::fs::read_to_string)
                .transpose()?,
        };

        let config = Self::parse(contents.as_deref().unwrap_or_default(), |key| {
            std::env::var(key).ok()
        })?;
        tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");
        Ok(config)
    }

    /// Build a configuration from TOML text and an environment lookup
    pub fn parse(contents: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;

        let data_dir = env("TRAVELER_DATA_DIR")
            .map(PathBuf::from)
            .or(file.data_dir)
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .ok_or(Error::NoDataDir)?;

        let cache_dir = file
            .cache_dir
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| data_dir.join("cache"));

        let defaults = PlacesConfig::default();
        let places = PlacesConfig {
            api_key: env("TRAVELER_PLACES_API_KEY")
                .or(file.places.api_key)
                .filter(|key| !key.is_empty()),
            query: file.places.query.unwrap_or(defaults.query),
            radius_m: file.places.radius_m.unwrap_or(defaults.radius_m),
            placeholder_url: file
                .places
                .placeholder_url
                .unwrap_or(defaults.placeholder_url),
            base_url: file.places.base_url.unwrap_or(defaults.base_url),
        };

        if places.radius_m == 0 || places.radius_m > MAX_RADIUS_M {
            return Err(Error::Config(format!(
                "places.radius_m must be between 1 and {MAX_RADIUS_M}, got {}",
                places.radius_m
            )));
        }

        Ok(Self {
            data_dir,
            cache_dir,
            home: file.home,
            places,
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_file_values_apply() {
        let config = Config::parse(
            r#"
            data_dir = "/tmp/journal"
            cache_dir = "/tmp/journal-cache"
            home = { latitude = 35.68, longitude = 139.69 }

            [places]
            api_key = "from-file"
            radius_m = 2000
            "#,
            no_env,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/journal"));
        assert_eq!(config.catalog_path(), PathBuf::from("/tmp/journal/traveler.db"));
        assert_eq!(config.home.unwrap().latitude, 35.68);
        assert_eq!(config.places.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.places.radius_m, 2000);
        assert_eq!(config.places.query, "Tourist attractions");
    }

    #[test]
    fn test_environment_wins() {
        let config = Config::parse(
            "data_dir = \"/tmp/a\"\n[places]\napi_key = \"file\"\n",
            |key| match key {
                "TRAVELER_DATA_DIR" => Some("/tmp/b".to_string()),
                "TRAVELER_PLACES_API_KEY" => Some("env".to_string()),
                _ => None,
            },
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/b"));
        assert_eq!(config.places.api_key.as_deref(), Some("env"));
    }

    #[test]
    fn test_empty_api_key_means_none() {
        let config = Config::parse("data_dir = \"/tmp/a\"", |key| {
            (key == "TRAVELER_PLACES_API_KEY").then(String::new)
        })
        .unwrap();
        assert!(config.places.api_key.is_none());
    }

    #[test]
    fn test_bad_radius_is_rejected() {
        let result = Config::parse("data_dir = \"/tmp/a\"\n[places]\nradius_m = 0\n", no_env);
        assert_matches!(result, Err(Error::Config(_)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = Config::parse("colour = \"blue\"", no_env);
        assert_matches!(result, Err(Error::ConfigParse(_)));
    }
}
