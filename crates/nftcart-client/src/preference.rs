//! # Sort Preference Store
//!
//! Persists the last sort criterion the user picked on the cart screen.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sort Preference Lifecycle                            │
//! │                                                                         │
//! │  First launch           load() ──► None   (nothing applied)            │
//! │       │                                                                 │
//! │  User picks "rating"    save(Rating)                                   │
//! │       │                                                                 │
//! │  App restarted          load() ──► Some(Rating)                        │
//! │       │                                                                 │
//! │  User picks "price"     save(Price)   (overwrites, no history)         │
//! │                                                                         │
//! │  • One value, process-wide, shared by every controller via Arc         │
//! │  • Idempotent, last write wins                                          │
//! │  • Never explicitly deleted                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! sort = "rating"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use nftcart_core::SortCriterion;

use crate::config::PreferenceSettings;
use crate::error::{ClientError, ClientResult};

/// File name used inside the platform config directory.
pub const PREFERENCE_FILE_NAME: &str = "sort_preference.toml";

// =============================================================================
// Store Trait
// =============================================================================

/// Get/set access to the single persisted sort criterion.
pub trait SortPreferenceStore: Send + Sync {
    /// Returns the last saved criterion, or `None` if never set.
    fn load(&self) -> ClientResult<Option<SortCriterion>>;

    /// Overwrites the persisted criterion.
    fn save(&self, criterion: SortCriterion) -> ClientResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Store that lives as long as the process. Used by tests and the demo.
#[derive(Debug, Default)]
pub struct MemorySortPreferenceStore {
    value: RwLock<Option<SortCriterion>>,
}

impl MemorySortPreferenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `criterion`.
    pub fn with_value(criterion: SortCriterion) -> Self {
        MemorySortPreferenceStore {
            value: RwLock::new(Some(criterion)),
        }
    }
}

impl SortPreferenceStore for MemorySortPreferenceStore {
    fn load(&self) -> ClientResult<Option<SortCriterion>> {
        self.value
            .read()
            .map(|guard| *guard)
            .map_err(|e| ClientError::PreferenceLoadFailed(e.to_string()))
    }

    fn save(&self, criterion: SortCriterion) -> ClientResult<()> {
        let mut guard = self
            .value
            .write()
            .map_err(|e| ClientError::PreferenceSaveFailed(e.to_string()))?;
        *guard = Some(criterion);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortCriterion>,
}

/// Store backed by a small TOML file, surviving restarts.
#[derive(Debug, Clone)]
pub struct FileSortPreferenceStore {
    path: PathBuf,
}

impl FileSortPreferenceStore {
    /// Creates a store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSortPreferenceStore { path: path.into() }
    }

    /// Creates a store in the platform config directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.fakenft.nftcart/`
    /// - **Windows**: `%APPDATA%\fakenft\nftcart\config\`
    /// - **Linux**: `~/.config/nftcart/`
    pub fn at_default_location() -> Option<Self> {
        default_preference_path().map(Self::new)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SortPreferenceStore for FileSortPreferenceStore {
    fn load(&self) -> ClientResult<Option<SortCriterion>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No sort preference file yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::PreferenceLoadFailed(e.to_string()))?;
        let file: PreferenceFile = toml::from_str(&contents)
            .map_err(|e| ClientError::PreferenceLoadFailed(e.to_string()))?;

        Ok(file.sort)
    }

    fn save(&self, criterion: SortCriterion) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::PreferenceSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(&PreferenceFile {
            sort: Some(criterion),
        })
        .map_err(|e| ClientError::PreferenceSaveFailed(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| ClientError::PreferenceSaveFailed(e.to_string()))?;

        debug!(path = ?self.path, %criterion, "Sort preference saved");
        Ok(())
    }
}

// =============================================================================
// Construction From Settings
// =============================================================================

/// Returns the default preference file path, if the platform has one.
pub fn default_preference_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "fakenft", "nftcart")
        .map(|dirs| dirs.config_dir().join(PREFERENCE_FILE_NAME))
}

/// Opens the process-wide store described by `settings`.
///
/// Falls back to an in-memory store when no path is configured and the
/// platform has no config directory.
pub fn open_store(settings: &PreferenceSettings) -> Arc<dyn SortPreferenceStore> {
    match settings.path.clone().or_else(default_preference_path) {
        Some(path) => {
            info!(?path, "Using file sort preference store");
            Arc::new(FileSortPreferenceStore::new(path))
        }
        None => {
            warn!("No config directory available, sort preference will not survive restarts");
            Arc::new(MemorySortPreferenceStore::new())
        }
    }
}
