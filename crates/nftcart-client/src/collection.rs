//! # Collection Controller
//!
//! Drives the "my NFTs" screen: loads the items the user owns, sorts them
//! and toggles favorites.
//!
//! ## Load Sequence
//! ```text
//! on_view_load()
//!   │
//!   ├─ profile.owned_item_ids() ── None ──► warn!, empty list, refresh
//!   │
//!   ▼ Some(ids)
//! fetcher.fetch_all(ids) ── each arriving item ──► collection.append
//!   │
//!   ▼ (all settled)
//! refresh_list + toggle_empty_state, FetchReport kept for inspection
//! ```

use std::sync::Arc;
use tracing::{debug, info, warn};

use nftcart_core::{Item, ItemCollection, SortCriterion, SortDirection};

use crate::config::CartConfig;
use crate::error::ClientResult;
use crate::favorites::FavoritesStore;
use crate::fetcher::{FetchReport, ItemSource, RemoteItemFetcher};
use crate::profile::ProfileSource;
use crate::view::{CollectionView, ViewSlot};

/// Owned-collection screen controller.
pub struct CollectionController {
    collection: ItemCollection,
    fetcher: RemoteItemFetcher,
    profile: Arc<dyn ProfileSource>,
    favorites: Arc<dyn FavoritesStore>,
    direction: SortDirection,
    view: ViewSlot<dyn CollectionView>,
    last_report: Option<FetchReport>,
}

impl CollectionController {
    pub fn new(
        fetcher: RemoteItemFetcher,
        profile: Arc<dyn ProfileSource>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        CollectionController {
            collection: ItemCollection::new(),
            fetcher,
            profile,
            favorites,
            direction: SortDirection::default(),
            view: ViewSlot::empty(),
            last_report: None,
        }
    }

    /// Wires a controller using the fetch and collection settings.
    pub fn from_config(
        source: Arc<dyn ItemSource>,
        profile: Arc<dyn ProfileSource>,
        favorites: Arc<dyn FavoritesStore>,
        config: &CartConfig,
    ) -> Self {
        Self::new(
            RemoteItemFetcher::with_settings(source, &config.fetch),
            profile,
            favorites,
        )
        .with_direction(config.collection.sort_direction)
    }

    /// Direction used by [`sort`](Self::sort).
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn attach(&mut self, view: &Arc<dyn CollectionView>) {
        self.view.attach(view);
    }

    pub fn detach(&mut self) {
        self.view.detach();
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads every owned item, then signals one refresh.
    ///
    /// Items that fail to load are left out. The list is rebuilt from
    /// scratch on every call.
    pub async fn on_view_load(&mut self) {
        self.collection.clear();

        let Some(ids) = self.profile.owned_item_ids() else {
            warn!("No profile loaded, showing empty collection");
            self.last_report = None;
            self.signal_loaded();
            return;
        };

        let collection = &mut self.collection;
        let report = self
            .fetcher
            .fetch_all(&ids, |item| {
                if let Err(e) = collection.append(item) {
                    warn!(error = %e, "Skipping item");
                }
            })
            .await;

        info!(
            owned = ids.len(),
            shown = self.collection.count(),
            "Owned collection loaded"
        );
        self.last_report = Some(report);
        self.signal_loaded();
    }

    fn signal_loaded(&self) {
        self.view.send("refresh_list", |v| v.refresh_list());
        self.show_or_hide_placeholder();
    }

    /// Shows the placeholder when nothing is owned.
    pub fn show_or_hide_placeholder(&self) {
        let is_empty = self.collection.is_empty();
        self.view
            .send("toggle_empty_state", |v| v.toggle_empty_state(is_empty));
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Asks the view to show the sort chooser.
    pub fn request_sort_options(&self) {
        self.view
            .send("present_sort_options", |v| v.present_sort_options());
    }

    /// Sorts in the configured direction. Items missing the field go last.
    ///
    /// Not persisted: the saved preference belongs to the cart.
    pub fn sort(&mut self, criterion: SortCriterion) {
        debug!(%criterion, direction = %self.direction, "Sorting owned collection");
        self.collection.sort_by_with(criterion, self.direction);
        self.view.send("refresh_list", |v| v.refresh_list());
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Flips the favorite mark and returns the state the store now reports.
    pub fn toggle_favorite(&self, item: &Item) -> ClientResult<bool> {
        if self.favorites.is_favorite(&item.id) {
            self.favorites.remove(&item.id)?;
        } else {
            self.favorites.add(&item.id)?;
        }
        Ok(self.favorites.is_favorite(&item.id))
    }

    pub fn is_favorite(&self, item: &Item) -> bool {
        self.favorites.is_favorite(&item.id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Report of the latest load, `None` before the first load or when the
    /// profile was missing.
    pub fn last_fetch_report(&self) -> Option<&FetchReport> {
        self.last_report.as_ref()
    }

    pub fn item_count(&self) -> usize {
        self.collection.count()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn item_at(&self, index: usize) -> &Item {
        self.collection.item_at(index)
    }

    pub fn items(&self) -> &[Item] {
        self.collection.items()
    }
}
