//! # Favorites
//!
//! Marking owned items as liked. The backend has no favorites endpoint the
//! client can use yet, so the default store reports "not favorited" for
//! everything and ignores writes.

use std::collections::HashSet;
use std::sync::RwLock;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Injected favorites collaborator.
pub trait FavoritesStore: Send + Sync {
    fn is_favorite(&self, id: &str) -> bool;
    fn add(&self, id: &str) -> ClientResult<()>;
    fn remove(&self, id: &str) -> ClientResult<()>;
}

/// Store that never records anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedFavoritesStore;

impl FavoritesStore for UnsupportedFavoritesStore {
    fn is_favorite(&self, _id: &str) -> bool {
        false
    }

    fn add(&self, id: &str) -> ClientResult<()> {
        debug!(id = %id, "Favorites unsupported, ignoring add");
        Ok(())
    }

    fn remove(&self, id: &str) -> ClientResult<()> {
        debug!(id = %id, "Favorites unsupported, ignoring remove");
        Ok(())
    }
}

/// Process-local favorites set.
#[derive(Debug, Default)]
pub struct MemoryFavoritesStore {
    ids: RwLock<HashSet<String>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn is_favorite(&self, id: &str) -> bool {
        self.ids
            .read()
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    fn add(&self, id: &str) -> ClientResult<()> {
        self.ids
            .write()
            .map_err(|e| ClientError::FavoritesUpdateFailed(e.to_string()))?
            .insert(id.to_string());
        Ok(())
    }

    fn remove(&self, id: &str) -> ClientResult<()> {
        self.ids
            .write()
            .map_err(|e| ClientError::FavoritesUpdateFailed(e.to_string()))?
            .remove(id);
        Ok(())
    }
}
