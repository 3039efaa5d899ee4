//! # Cart Configuration
//!
//! Loads settings for the cart and owned-collection controllers.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Configuration Load Order                            │
//! │                                                                         │
//! │  1. Defaults (this file)                                               │
//! │       │                                                                 │
//! │  2. Config file: nftcart.toml in the platform config directory,        │
//! │       │          or an explicit path                                   │
//! │       │                                                                 │
//! │  3. Environment: NFTCART_PREFERENCES_PATH                              │
//! │       │          NFTCART_DEFAULT_SORT                                   │
//! │       │          NFTCART_MAX_CONCURRENT_FETCHES                         │
//! │       │          NFTCART_COLLECTION_SORT_DIRECTION                      │
//! │       ▼                                                                 │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! [preferences]
//! path = "/var/mobile/nftcart/sort_preference.toml"
//! default_sort = "name"
//!
//! [fetch]
//! max_concurrent_requests = 8
//!
//! [collection]
//! sort_direction = "descending"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use nftcart_core::{SortCriterion, SortDirection};

use crate::error::{ClientError, ClientResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "nftcart.toml";

// =============================================================================
// Preference Settings
// =============================================================================

/// Where the sort preference lives and what to do before one exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceSettings {
    /// Explicit preference file. Defaults to the platform config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Criterion applied when nothing was persisted yet.
    ///
    /// Absent (the default) means the cart keeps its seed order until the
    /// user picks a criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortCriterion>,
}

// =============================================================================
// Fetch Settings
// =============================================================================

/// Remote item fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Maximum number of item requests in flight at once.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_max_concurrent_requests() -> usize {
    8
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

// =============================================================================
// Collection Settings
// =============================================================================

/// Owned-collection screen settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSettings {
    /// Direction used by the collection's sort chooser.
    #[serde(default)]
    pub sort_direction: SortDirection,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    /// Sort preference persistence.
    #[serde(default)]
    pub preferences: PreferenceSettings,

    /// Remote fetching.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Owned-collection screen.
    #[serde(default)]
    pub collection: CollectionSettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        if self.fetch.max_concurrent_requests == 0 {
            return Err(ClientError::InvalidConfig(
                "fetch.max_concurrent_requests must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.preferences.path {
            if path.as_os_str().is_empty() {
                return Err(ClientError::InvalidConfig(
                    "preferences.path must not be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("NFTCART_PREFERENCES_PATH") {
            debug!(path = %path, "Overriding preference path from environment");
            self.preferences.path = Some(PathBuf::from(path));
        }

        if let Ok(sort) = std::env::var("NFTCART_DEFAULT_SORT") {
            match sort.parse() {
                Ok(parsed) => self.preferences.default_sort = Some(parsed),
                Err(e) => warn!(sort = %sort, error = %e, "Ignoring default sort from environment"),
            }
        }

        if let Ok(max) = std::env::var("NFTCART_MAX_CONCURRENT_FETCHES") {
            match max.parse::<usize>() {
                Ok(n) => {
                    debug!(max = n, "Overriding fetch concurrency from environment");
                    self.fetch.max_concurrent_requests = n;
                }
                Err(e) => warn!(max = %max, error = %e, "Ignoring fetch concurrency from environment"),
            }
        }

        if let Ok(direction) = std::env::var("NFTCART_COLLECTION_SORT_DIRECTION") {
            match direction.parse() {
                Ok(parsed) => self.collection.sort_direction = parsed,
                Err(e) => warn!(direction = %direction, error = %e, "Ignoring sort direction from environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fakenft", "nftcart")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.fetch.max_concurrent_requests, 8);
        assert_eq!(config.collection.sort_direction, SortDirection::Ascending);
        assert!(config.preferences.default_sort.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();
        config.fetch.max_concurrent_requests = 0;
        assert!(config.validate().unwrap_err().is_config_error());

        config.fetch.max_concurrent_requests = 1;
        config.preferences.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_concurrency_override_is_ignored() {
        std::env::set_var("NFTCART_MAX_CONCURRENT_FETCHES", "lots");
        let mut config = CartConfig::default();
        config.apply_env_overrides();
        std::env::remove_var("NFTCART_MAX_CONCURRENT_FETCHES");

        assert_eq!(config.fetch.max_concurrent_requests, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [collection]
            sort_direction = "descending"
            "#,
        )
        .unwrap();
        assert_eq!(config.collection.sort_direction, SortDirection::Descending);
        assert_eq!(config.fetch.max_concurrent_requests, 8);
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = CartConfig::default();
        config.preferences.default_sort = Some(SortCriterion::Name);
        config.fetch.max_concurrent_requests = 3;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[fetch]"));
        assert!(contents.contains("default_sort = \"name\""));

        let loaded: CartConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.preferences.default_sort, Some(SortCriterion::Name));
        assert_eq!(loaded.fetch.max_concurrent_requests, 3);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[fetch]\nmax_concurrent_requests = \"many\"").unwrap();

        let err = CartConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, ClientError::ConfigLoadFailed(_)));
    }
}
