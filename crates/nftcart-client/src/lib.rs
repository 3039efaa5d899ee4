//! # nftcart-client: Controllers for the Cart and My-NFTs Screens
//!
//! This crate turns the pure `nftcart-core` model into screen controllers:
//! it persists the sort preference, fetches owned items from the backend,
//! and coordinates the delete and checkout confirmations.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Client Architecture                             │
//! │                                                                         │
//! │  ┌───────────────────────────────┐    ┌──────────────────────────────┐ │
//! │  │        CartController         │    │    CollectionController      │ │
//! │  │                               │    │                              │ │
//! │  │  seed items, sort, totals     │    │  profile ──► fetch_all       │ │
//! │  │  Idle / AwaitingDeletion /    │    │  sort (configured direction) │ │
//! │  │  AwaitingCheckout             │    │  favorites                   │ │
//! │  └───────┬──────────────┬────────┘    └───────┬──────────────────────┘ │
//! │          │ oneshot      │                     │                        │
//! │  ┌───────▼────────┐ ┌───▼──────────┐  ┌───────▼──────────┐             │
//! │  │ Deletion flow  │ │ Checkout flow│  │ RemoteItemFetcher│             │
//! │  └────────────────┘ └──────────────┘  │ (ItemSource)     │             │
//! │                                       └──────────────────┘             │
//! │  ┌────────────────────┐  ┌───────────────────┐                         │
//! │  │ SortPreferenceStore│  │ CartConfig (TOML) │                         │
//! │  └────────────────────┘  └───────────────────┘                         │
//! │                                                                         │
//! │  VIEW SIGNALS go through weak ViewSlot handles (view.rs).              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`cart`] - Cart screen controller and its state machine
//! - [`collection`] - Owned-collection screen controller
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Client error types
//! - [`favorites`] - Favorites store port and implementations
//! - [`fetcher`] - All-settle batch fetcher and the `ItemSource` port
//! - [`flow`] - Deletion and checkout child flows
//! - [`preference`] - Persisted sort criterion
//! - [`profile`] - Profile data source
//! - [`view`] - View signal traits and the weak view handle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nftcart_client::{CartConfig, CartController, demo_cart_items};
//! use nftcart_core::ItemCollection;
//!
//! let config = CartConfig::load_or_default(None);
//! let seed = ItemCollection::from_items(demo_cart_items())?;
//! let mut cart = CartController::from_config(seed, &config);
//! cart.attach(&view);
//! cart.on_view_will_appear();
//!
//! let flow = cart.request_deletion(0)?;
//! flow.confirm();
//! cart.await_pending_flow().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod collection;
pub mod config;
pub mod error;
pub mod favorites;
pub mod fetcher;
pub mod flow;
pub mod preference;
pub mod profile;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::{demo_cart_items, CartController, CartState};
pub use collection::CollectionController;
pub use config::{CartConfig, CollectionSettings, FetchSettings, PreferenceSettings};
pub use error::{ClientError, ClientResult};
pub use favorites::{FavoritesStore, MemoryFavoritesStore, UnsupportedFavoritesStore};
pub use fetcher::{
    FetchFailure, FetchReport, ItemSource, RemoteItemFetcher, RemoteItemRecord, StaticItemSource,
};
pub use flow::{CheckoutFlow, DeletionConfirmationFlow};
pub use preference::{
    open_store, FileSortPreferenceStore, MemorySortPreferenceStore, SortPreferenceStore,
};
pub use profile::{ProfileRecord, ProfileSource, StaticProfile};
pub use view::{CartView, CollectionView, NoOpView, ViewSlot};
